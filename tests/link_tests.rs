mod common;

use clickthrough::dom::cache::DomCache;
use clickthrough::dom::document::Document;
use clickthrough::error::DriverError;
use clickthrough::interact::interactable::Interactable;
use clickthrough::interact::link::{ClickOptions, ClickOutcome, Link, Location, resolve_href};
use clickthrough::transport::params::ParamValue;
use clickthrough::transport::request::HttpMethod;

use common::{TOKEN, guarded, html, link, method_onclick};

fn location() -> Location {
    Location::new("/posts", "www.example.com")
}

fn first_link(doc: &Document) -> Link<'_> {
    doc.links().next().expect("document should have a link")
}

// ============================================================================
// 1. href resolution
// ============================================================================

#[test]
fn absolute_path_is_kept() {
    assert_eq!(resolve_href("/login", &location()), "/login");
}

#[test]
fn own_host_url_is_made_relative() {
    assert_eq!(
        resolve_href("http://www.example.com/posts/1?page=2#c3", &location()),
        "/posts/1?page=2#c3"
    );
    assert_eq!(resolve_href("https://www.example.com/", &location()), "/");
    assert_eq!(resolve_href("http://www.example.com", &location()), "/");
    assert_eq!(resolve_href("http://www.example.com:3000/admin", &location()), "/admin");
}

#[test]
fn own_host_url_keeps_the_rest_of_the_href_untouched() {
    assert_eq!(
        resolve_href("http://www.example.com/a/../b?q=a b|c", &location()),
        "/a/../b?q=a b|c"
    );
}

#[test]
fn foreign_url_is_kept_verbatim() {
    assert_eq!(
        resolve_href("http://elsewhere.org/about", &location()),
        "http://elsewhere.org/about"
    );
}

#[test]
fn query_only_href_extends_current_url() {
    assert_eq!(resolve_href("?page=3", &location()), "/posts?page=3");
}

#[test]
fn relative_href_hangs_off_current_url() {
    assert_eq!(resolve_href("new", &location()), "/posts/new");
}

// ============================================================================
// 2. Matching helpers
// ============================================================================

#[test]
fn matches_text_is_case_insensitive_substring() {
    let doc = Document::parse(&html(&link("/posts/1", "Delete Post", None)), 0);
    let link = first_link(&doc);
    assert!(link.matches_text("delete"));
    assert!(link.matches_text("POST"));
    assert!(!link.matches_text("edit"));
}

#[test]
fn matches_text_normalizes_non_breaking_spaces() {
    let doc = Document::parse(&html("<a href=\"/signup\">Sign&nbsp;up</a>"), 0);
    let link = first_link(&doc);
    assert_eq!(link.text(), "Sign up");
    assert!(link.matches_text("sign up"));
}

#[test]
fn matches_text_falls_back_to_title() {
    let doc = Document::parse(&html("<a href=\"/x\" title=\"Remove item\"><img src=\"x.png\"></a>"), 0);
    assert!(first_link(&doc).matches_text("remove"));
}

#[test]
fn matches_href_requires_full_equality() {
    let doc = Document::parse(&html(&link("/Posts/1", "Show", None)), 0);
    let link = first_link(&doc);
    assert!(link.matches_href("/posts/1"));
    assert!(!link.matches_href("/posts"));
}

#[test]
fn matches_method_uses_inference() {
    let js = method_onclick("put", None);
    let doc = Document::parse(&html(&link("/posts/1", "Publish", Some(&js))), 0);
    let link = first_link(&doc);
    assert!(link.matches_method(HttpMethod::Put).unwrap());
    assert!(!link.matches_method(HttpMethod::Get).unwrap());
    // asking twice gives the same answer
    assert!(link.matches_method(HttpMethod::Put).unwrap());
}

// ============================================================================
// 3. Click outcomes
// ============================================================================

#[test]
fn plain_link_requests_get() {
    let doc = Document::parse(&html(&link("/posts/1", "Show", None)), 0);
    let outcome = first_link(&doc)
        .click(None, ClickOptions::default(), &location())
        .unwrap();
    match outcome {
        ClickOutcome::Request(intent) => {
            assert_eq!(intent.method, HttpMethod::Get);
            assert_eq!(intent.url, "/posts/1");
            assert!(intent.payload.is_empty());
        }
        other => panic!("Expected a request, got {:?}", other),
    }
}

#[test]
fn method_link_carries_token() {
    let js = method_onclick("delete", Some(TOKEN));
    let doc = Document::parse(&html(&link("/login", "Sign out", Some(&js))), 0);
    let outcome = first_link(&doc)
        .click(None, ClickOptions::default(), &location())
        .unwrap();
    let ClickOutcome::Request(intent) = outcome else {
        panic!("Expected a request");
    };
    assert_eq!(intent.method, HttpMethod::Delete);
    assert_eq!(intent.url, "/login");
    assert_eq!(
        intent.payload.get("authenticity_token"),
        Some(&ParamValue::Text(TOKEN.into()))
    );
}

#[test]
fn explicit_method_overrides_inference() {
    let doc = Document::parse(&html(&link("/posts/1", "Show", None)), 0);
    let outcome = first_link(&doc)
        .click(Some(HttpMethod::Post), ClickOptions::default(), &location())
        .unwrap();
    assert!(matches!(outcome, ClickOutcome::Request(ref i) if i.method == HttpMethod::Post));
}

#[test]
fn fragment_link_is_ignored() {
    let doc = Document::parse(&html(&link("#comments", "Comments", None)), 0);
    let outcome = first_link(&doc)
        .click(None, ClickOptions::default(), &location())
        .unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored);
}

#[test]
fn confirm_guard_defers_the_click() {
    let js = guarded("Are you sure?", &method_onclick("delete", Some(TOKEN)));
    let doc = Document::parse(&html(&link("/posts/1", "Destroy", Some(&js))), 0);
    let outcome = first_link(&doc)
        .click(None, ClickOptions::default(), &location())
        .unwrap();
    assert_eq!(
        outcome,
        ClickOutcome::Confirm {
            message: "Are you sure?".into(),
            method: HttpMethod::Delete,
        }
    );
}

#[test]
fn confirmed_click_goes_through() {
    let js = guarded("Are you sure?", &method_onclick("delete", Some(TOKEN)));
    let doc = Document::parse(&html(&link("/posts/1", "Destroy", Some(&js))), 0);
    let outcome = first_link(&doc)
        .click(Some(HttpMethod::Delete), ClickOptions::confirmed(), &location())
        .unwrap();
    assert!(matches!(outcome, ClickOutcome::Request(ref i) if i.method == HttpMethod::Delete));
}

#[test]
fn without_javascript_is_plain_get() {
    let js = guarded("Are you sure?", &method_onclick("delete", Some(TOKEN)));
    let doc = Document::parse(&html(&link("/posts/1", "Destroy", Some(&js))), 0);
    let outcome = first_link(&doc)
        .click(None, ClickOptions::without_javascript(), &location())
        .unwrap();
    match outcome {
        ClickOutcome::Request(intent) => {
            assert_eq!(intent.method, HttpMethod::Get);
            assert!(intent.payload.is_empty());
            assert!(!intent.javascript_enabled);
        }
        other => panic!("Expected a request, got {:?}", other),
    }
}

#[test]
fn unknown_ajax_verb_fails_the_click() {
    let js = "new Ajax.Request('/posts/1', {method:'patch'}); return false;";
    let doc = Document::parse(&html(&link("/posts/1", "Touch", Some(js))), 0);
    let err = first_link(&doc)
        .click(None, ClickOptions::default(), &location())
        .unwrap_err();
    assert!(matches!(err, DriverError::MethodInference { .. }));
}

// ============================================================================
// 4. Document and cache
// ============================================================================

#[test]
fn links_are_listed_in_document_order() {
    let body = html(&format!(
        "{}{}<a name=\"anchor\">no href</a>{}",
        link("/a", "First", None),
        link("/b", "Second", None),
        link("/c", "Third", None)
    ));
    let doc = Document::parse(&body, 0);
    let texts: Vec<String> = doc.links().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["First", "Second", "Third"]);
}

#[test]
fn page_text_leaves_out_scripts_and_styles() {
    let body = "<html><head><style>p { color: red }</style>\
                <script>var msg = 'Secret error';</script></head>\
                <body><p>Hello</p><script>alert('boom')</script></body></html>";
    let doc = Document::parse(body, 0);
    assert_eq!(doc.text(), "Hello");
}

#[test]
fn handle_from_another_generation_is_stale() {
    let body = html(&link("/a", "First", None));
    let old = Document::parse(&body, 1);
    let handle = first_link(&old).handle();

    let current = Document::parse(&body, 2);
    match current.link(handle) {
        Err(DriverError::StaleHandle {
            handle_generation,
            current_generation,
        }) => {
            assert_eq!(handle_generation, 1);
            assert_eq!(current_generation, 2);
        }
        other => panic!("Expected StaleHandle, got {:?}", other.map(|l| l.text())),
    }
}

#[test]
fn cache_without_body_has_no_page() {
    let cache = DomCache::new();
    assert!(matches!(cache.document(None), Err(DriverError::NoPageLoaded)));
}

#[test]
fn cache_parses_once_until_invalidated() {
    let mut cache = DomCache::new();
    assert!(!cache.is_parsed());

    let body = html(&link("/a", "First", None));
    assert_eq!(cache.document(Some(&body)).unwrap().links().count(), 1);
    assert!(cache.is_parsed());

    // a different body is ignored while the parse is memoized
    assert_eq!(cache.document(Some("<p>other</p>")).unwrap().links().count(), 1);

    let before = cache.generation();
    cache.invalidate();
    assert_eq!(cache.generation(), before + 1);
    assert!(!cache.is_parsed());
    assert_eq!(cache.document(Some("<p>other</p>")).unwrap().links().count(), 0);
}
