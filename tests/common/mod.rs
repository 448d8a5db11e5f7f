#![allow(dead_code)]

use clickthrough::page::config::SessionConfig;
use clickthrough::page::page::Page;
use clickthrough::transport::params::Params;
use clickthrough::transport::request::HttpMethod;
use clickthrough::transport::stub::StubTransport;

pub const TOKEN: &str = "aa79cb354597a60a3786e7e291ed4f74d77d3a62";

/// Session config that never writes snapshots.
pub fn quiet_config() -> SessionConfig {
    SessionConfig::default().with_snapshot_dir(None)
}

/// A page already showing `body` at `url`.
pub fn open_page(url: &str, body: &str) -> Page<StubTransport> {
    open_page_with(url, body, quiet_config())
}

pub fn open_page_with(url: &str, body: &str, config: SessionConfig) -> Page<StubTransport> {
    let transport = StubTransport::new().with_page(body);
    Page::open(transport, config, url, HttpMethod::Get, Params::new()).expect("initial page should load")
}

/// The handler a `:method => ...` link helper renders.
pub fn method_onclick(verb: &str, token: Option<&str>) -> String {
    let mut js = String::from(
        "var f = document.createElement('form'); f.style.display = 'none'; \
         this.parentNode.appendChild(f); f.method = 'POST'; f.action = this.href;",
    );
    js.push_str(&format!(
        "var m = document.createElement('input'); m.setAttribute('type', 'hidden'); \
         m.setAttribute('name', '_method'); m.setAttribute('value', '{}'); f.appendChild(m);",
        verb
    ));
    if let Some(token) = token {
        js.push_str(&format!(
            "var s = document.createElement('input'); s.setAttribute('type', 'hidden'); \
             s.setAttribute('name', 'authenticity_token'); s.setAttribute('value', '{}'); f.appendChild(s);",
            token
        ));
    }
    js.push_str("f.submit();return false;");
    js
}

/// Wrap a handler in a `confirm()` guard, as `:confirm => ...` does.
pub fn guarded(message: &str, js: &str) -> String {
    format!("if (confirm('{}')) {{ {} }};return false;", message, js)
}

pub fn link(href: &str, text: &str, onclick: Option<&str>) -> String {
    match onclick {
        Some(js) => format!("<a href=\"{}\" onclick=\"{}\">{}</a>", href, js, text),
        None => format!("<a href=\"{}\">{}</a>", href, text),
    }
}

pub fn html(body: &str) -> String {
    format!("<html><head><title>Test</title></head><body>{}</body></html>", body)
}
