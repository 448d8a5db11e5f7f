use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::dom::cache::DomCache;
use crate::dom::document::Document;
use crate::dom::element::ElementHandle;
use crate::error::{DriverError, Result};
use crate::form::field::{Field, FieldKind};
use crate::form::form::{Form, FormNode};
use crate::interact::interactable::Interactable;
use crate::interact::link::{ClickOptions, ClickOutcome, Link, Location};
use crate::page::config::{AbandonedConfirmation, SessionConfig};
use crate::page::snapshot::Snapshotter;
use crate::popup::engine::{PendingConfirmation, PopupEngine, ResumeAction};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{TraceEvent, TraceKind};
use crate::transport::Transport;
use crate::transport::params::Params;
use crate::transport::request::{HttpMethod, RequestIntent, Response};

/// The page a test is looking at, and the only way to act on it.
///
/// A `Page` owns the transport, the last response, the lazily parsed
/// document and the confirmation popup. Every navigation goes through
/// [`Page::request_page`]: the request is sent, the response must be a
/// success, and the parsed document is thrown away so the next lookup sees
/// the new markup.
pub struct Page<T: Transport> {
    transport: T,
    config: SessionConfig,
    response: Option<Response>,
    last_request: Option<RequestIntent>,
    dom: DomCache,
    popup: PopupEngine,
    snapshotter: Snapshotter,
    tracer: TraceLogger,
    step: u64,
}

impl<T: Transport> Page<T> {
    /// A page with nothing loaded yet.
    pub fn new(transport: T, config: SessionConfig) -> Self {
        let snapshotter = Snapshotter::from_config(&config.snapshot);
        let tracer = TraceLogger::from_path(config.trace_file.as_deref());
        Page {
            transport,
            config,
            response: None,
            last_request: None,
            dom: DomCache::new(),
            popup: PopupEngine::new(),
            snapshotter,
            tracer,
            step: 0,
        }
    }

    /// A page that starts by requesting `url`.
    pub fn open(
        transport: T,
        config: SessionConfig,
        url: &str,
        method: HttpMethod,
        params: Params,
    ) -> Result<Self> {
        let mut page = Self::new(transport, config);
        page.request_page(url, method, params)?;
        Ok(page)
    }

    pub fn with_snapshotter(mut self, snapshotter: Snapshotter) -> Self {
        self.snapshotter = snapshotter;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    // ========================================================================
    // State
    // ========================================================================

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn body(&self) -> Option<&str> {
        self.response.as_ref().map(|r| r.body.as_str())
    }

    /// The request that produced the current page, as `reloads` would repeat it.
    pub fn last_request(&self) -> Option<&RequestIntent> {
        self.last_request.as_ref()
    }

    /// URL of the current page; empty before the first navigation.
    pub fn current_url(&self) -> &str {
        self.response
            .as_ref()
            .and_then(|r| r.url.as_deref())
            .or_else(|| self.last_request.as_ref().map(|r| r.url.as_str()))
            .unwrap_or_default()
    }

    pub fn dom_generation(&self) -> u64 {
        self.dom.generation()
    }

    /// Current URL and app host, for resolving hrefs.
    pub fn location(&self) -> Location {
        Location::new(self.current_url(), self.config.app_host.as_str())
    }

    /// Install a response without requesting it, e.g. a fixture page.
    ///
    /// This counts as navigating away, so a pending confirmation is settled
    /// first, the same as for a real request.
    pub fn load_response(&mut self, response: Response) -> Result<()> {
        self.settle_abandoned_confirmation()?;
        self.response = Some(response);
        self.dom.invalidate();
        Ok(())
    }

    /// The current document, parsed on first access after a navigation.
    pub fn document(&self) -> Result<&Document> {
        self.dom.document(self.response.as_ref().map(|r| r.body.as_str()))
    }

    fn document_mut(&mut self) -> Result<&mut Document> {
        self.dom
            .document_mut(self.response.as_ref().map(|r| r.body.as_str()))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn visit(&mut self, url: &str) -> Result<()> {
        self.request_page(url, HttpMethod::Get, Params::new())
    }

    pub fn request_page(&mut self, url: &str, method: HttpMethod, params: Params) -> Result<()> {
        let intent = RequestIntent::new(url, method, params).with_javascript(self.config.javascript);
        self.dispatch(intent)
    }

    /// Repeat the last successful request, form data included.
    pub fn reloads(&mut self) -> Result<()> {
        let intent = self.last_request.clone().ok_or(DriverError::NoPageLoaded)?;
        self.dispatch(intent)
    }

    fn dispatch(&mut self, intent: RequestIntent) -> Result<()> {
        self.settle_abandoned_confirmation()?;
        self.step += 1;

        debug!(
            "REQUESTING PAGE: {} {} with {:?}",
            intent.method, intent.url, intent.payload
        );
        let response = self.transport.request(&intent)?;

        let marker = self.config.exception_marker.as_str();
        if (!marker.is_empty() && response.body.contains(marker)) || response.body.trim().is_empty() {
            if let Some(path) = self.snapshotter.save_and_open(&response.body) {
                self.tracer.log(
                    &TraceEvent::now(self.step, TraceKind::Snapshot).with_message(path.display()),
                );
            }
        }

        let status = response.status;
        let success = response.is_success();
        self.tracer.log(
            &TraceEvent::now(self.step, TraceKind::Request)
                .with_request(&intent)
                .with_status(status),
        );

        self.response = Some(response);
        self.dom.invalidate();

        if !success {
            return Err(DriverError::RequestFailed {
                method: intent.method,
                url: intent.url,
                status,
            });
        }

        self.last_request = Some(intent);
        Ok(())
    }

    fn settle_abandoned_confirmation(&mut self) -> Result<()> {
        let Some(message) = self.popup.message().map(str::to_string) else {
            return Ok(());
        };

        match self.config.abandoned_confirmation {
            AbandonedConfirmation::Fail => Err(DriverError::IllegalState(format!(
                "cannot navigate while confirmation {:?} is pending",
                message
            ))),
            AbandonedConfirmation::Discard => {
                self.popup.abandon();
                warn!("discarding unanswered confirmation {:?}", message);
                self.tracer.log(
                    &TraceEvent::now(self.step, TraceKind::PopupAbandoned).with_message(&message),
                );
                Ok(())
            }
        }
    }

    // ========================================================================
    // Links
    // ========================================================================

    pub fn links(&self) -> Result<Vec<Link<'_>>> {
        Ok(self.document()?.links().collect())
    }

    /// The link whose text (or title) contains `text`; the shortest text wins.
    pub fn find_link(&self, text: &str) -> Result<Link<'_>> {
        self.document()?
            .links()
            .filter(|link| link.matches_text(text))
            .min_by_key(|link| link.text().chars().count())
            .ok_or_else(|| DriverError::Lookup(format!("Could not find link with text {:?}", text)))
    }

    fn default_click_options(&self) -> ClickOptions {
        ClickOptions {
            javascript: Some(self.config.javascript),
            confirm_popup: false,
        }
    }

    pub fn click_link(
        &mut self,
        link: ElementHandle,
        method: Option<HttpMethod>,
        options: ClickOptions,
    ) -> Result<()> {
        let location = self.location();
        let outcome = self.document()?.link(link)?.click(method, options, &location)?;

        match outcome {
            ClickOutcome::Ignored => {
                debug!("ignoring click on in-page anchor {}", link);
                Ok(())
            }
            ClickOutcome::Confirm { message, method } => {
                self.block(message, ResumeAction::ClickLink { link, method })
            }
            ClickOutcome::Request(intent) => self.dispatch(intent),
        }
    }

    fn click_link_by_text(&mut self, text: &str, method: Option<HttpMethod>) -> Result<()> {
        let handle = self.find_link(text)?.handle();
        let options = self.default_click_options();
        self.click_link(handle, method, options)
    }

    /// Follow a link, honouring the verb its onclick handler would use.
    pub fn clicks_link(&mut self, text: &str) -> Result<()> {
        self.click_link_by_text(text, None)
    }

    pub fn clicks_get_link(&mut self, text: &str) -> Result<()> {
        self.click_link_by_text(text, Some(HttpMethod::Get))
    }

    pub fn clicks_post_link(&mut self, text: &str) -> Result<()> {
        self.click_link_by_text(text, Some(HttpMethod::Post))
    }

    pub fn clicks_put_link(&mut self, text: &str) -> Result<()> {
        self.click_link_by_text(text, Some(HttpMethod::Put))
    }

    pub fn clicks_delete_link(&mut self, text: &str) -> Result<()> {
        self.click_link_by_text(text, Some(HttpMethod::Delete))
    }

    // ========================================================================
    // Confirmation popup
    // ========================================================================

    pub fn is_blocked(&self) -> bool {
        self.popup.is_blocked()
    }

    pub fn popup_message(&self) -> Option<&str> {
        self.popup.message()
    }

    fn block(&mut self, message: String, action: ResumeAction) -> Result<()> {
        info!("confirmation popup: {:?}", message);
        self.popup.block(PendingConfirmation {
            message: message.clone(),
            action,
        })?;
        self.tracer
            .log(&TraceEvent::now(self.step, TraceKind::PopupBlocked).with_message(message));
        Ok(())
    }

    /// Answer the pending confirmation with `"OK"` or `"CANCEL"`.
    pub fn press_button(&mut self, button: &str) -> Result<()> {
        let message = self.popup.message().map(str::to_string).unwrap_or_default();

        match self.popup.press_button(button)? {
            None => {
                info!("cancelled confirmation {:?}", message);
                self.tracer.log(
                    &TraceEvent::now(self.step, TraceKind::PopupCancelled).with_message(message),
                );
                Ok(())
            }
            Some(action) => {
                info!("accepted confirmation {:?}", message);
                self.tracer.log(
                    &TraceEvent::now(self.step, TraceKind::PopupAccepted).with_message(message),
                );
                match action {
                    ResumeAction::ClickLink { link, method } => {
                        self.click_link(link, Some(method), ClickOptions::confirmed())
                    }
                    ResumeAction::SubmitForm { form, button } => self.submit_form(form, button, true),
                }
            }
        }
    }

    pub fn dismiss_popup(&mut self, button: &str) -> Result<()> {
        self.press_button(button)
    }

    // ========================================================================
    // Forms
    // ========================================================================

    pub fn forms(&self) -> Result<Vec<Form<'_>>> {
        Ok(self.document()?.forms().collect())
    }

    /// The form with `id`, or the first form when `id` is `None`.
    pub fn find_form(&self, id: Option<&str>) -> Result<Form<'_>> {
        self.document()?.find_form(id)
    }

    /// Locate a field by id, name or label, optionally within one form.
    pub fn find_field(
        &self,
        identifier: &str,
        form_id: Option<&str>,
        kinds: &[FieldKind],
    ) -> Result<&Field> {
        let doc = self.document()?;
        let found = match form_id {
            Some(_) => doc.find_form(form_id)?.find_field(Some(identifier), kinds),
            None => doc
                .forms()
                .find_map(|form| form.find_field(Some(identifier), kinds)),
        };
        found.ok_or_else(|| DriverError::Lookup(format!("Could not find field {:?}", identifier)))
    }

    pub fn field_value(&self, identifier: &str, form_id: Option<&str>) -> Result<Option<String>> {
        Ok(self
            .find_field(identifier, form_id, &[])?
            .value()
            .map(str::to_string))
    }

    fn locate_field(
        &self,
        identifier: &str,
        kinds: &[FieldKind],
    ) -> Result<Option<(ElementHandle, usize)>> {
        Ok(self.document()?.forms().find_map(|form| {
            form.node()
                .locate(Some(identifier), kinds)
                .map(|position| (form.handle(), position))
        }))
    }

    fn update_form<R>(&mut self, form: ElementHandle, update: impl FnOnce(&mut FormNode) -> R) -> Result<R> {
        let node = self.document_mut()?.form_node_mut(form)?;
        Ok(update(node))
    }

    /// Type `value` into a text input, password input or textarea.
    pub fn fills_in(&mut self, identifier: &str, value: &str) -> Result<()> {
        let (form, position) = self
            .locate_field(identifier, FieldKind::FILLABLE)?
            .ok_or_else(|| {
                DriverError::Lookup(format!(
                    "Could not find text or password input or textarea {:?}",
                    identifier
                ))
            })?;
        self.update_form(form, |node| {
            if let Some(field) = node.field_mut(position) {
                field.set(value);
            }
        })
    }

    pub fn checks(&mut self, identifier: &str) -> Result<()> {
        self.set_checkbox(identifier, true)
    }

    pub fn unchecks(&mut self, identifier: &str) -> Result<()> {
        self.set_checkbox(identifier, false)
    }

    fn set_checkbox(&mut self, identifier: &str, checked: bool) -> Result<()> {
        let (form, position) = self
            .locate_field(identifier, &[FieldKind::Checkbox])?
            .ok_or_else(|| DriverError::Lookup(format!("Could not find checkbox {:?}", identifier)))?;
        self.update_form(form, |node| {
            if let Some(field) = node.field_mut(position) {
                if checked {
                    field.check();
                } else {
                    field.uncheck();
                }
            }
        })
    }

    /// Select a radio button, clearing the rest of its group.
    pub fn chooses(&mut self, identifier: &str) -> Result<()> {
        let (form, position) = self
            .locate_field(identifier, &[])?
            .ok_or_else(|| DriverError::Lookup(format!("Could not find radio button {:?}", identifier)))?;

        let kind = self.document()?.form(form)?.fields()[position].kind();
        if kind != FieldKind::Radio {
            return Err(DriverError::Lookup(format!(
                "Input {:?} is not a radio button",
                identifier
            )));
        }
        self.update_form(form, |node| node.choose(position))
    }

    /// Pick the option with `option_text`, from the select named by `from`
    /// or from the first select that offers it.
    pub fn selects(&mut self, option_text: &str, from: Option<&str>) -> Result<()> {
        let located = match from {
            Some(from) => self
                .locate_field(from, &[FieldKind::Select])?
                .ok_or_else(|| DriverError::Lookup(format!("Could not find select {:?}", from)))?,
            None => self
                .document()?
                .forms()
                .find_map(|form| {
                    form.fields()
                        .iter()
                        .position(|f| f.kind() == FieldKind::Select && f.has_option(option_text))
                        .map(|position| (form.handle(), position))
                })
                .ok_or_else(|| DriverError::Lookup(format!("Could not find option {:?}", option_text)))?,
        };

        let (form, position) = located;
        self.update_form(form, |node| match node.field_mut(position) {
            Some(field) => field.select_option(option_text),
            None => Err(DriverError::Lookup(format!("Could not find option {:?}", option_text))),
        })?
    }

    /// Press a submit button; `None` presses the first one on the page.
    pub fn clicks_button(&mut self, label: Option<&str>) -> Result<()> {
        let (form, button) = self
            .document()?
            .forms()
            .find_map(|form| form.find_button(label).map(|b| (form.handle(), b.handle())))
            .ok_or_else(|| {
                DriverError::Lookup(format!("Could not find button {:?}", label.unwrap_or_default()))
            })?;
        self.submit_form(form, Some(button), false)
    }

    /// Submit the form with `form_id`, or the first form on the page.
    pub fn submits_form(&mut self, form_id: Option<&str>) -> Result<()> {
        let form = self.find_form(form_id)?.handle();
        self.submit_form(form, None, false)
    }

    fn submit_form(
        &mut self,
        form: ElementHandle,
        button: Option<ElementHandle>,
        confirmed: bool,
    ) -> Result<()> {
        let current_url = self.current_url().to_string();
        let javascript = self.config.javascript;

        let (intent, confirm) = {
            let view = self.document()?.form(form)?;
            let pressed = button.map(|b| view.button(b)).transpose()?;
            let confirm = if javascript && !confirmed {
                view.confirm_message()
            } else {
                None
            };
            (view.submission(pressed.as_ref(), &current_url), confirm)
        };

        if let Some(message) = confirm {
            return self.block(message, ResumeAction::SubmitForm { form, button });
        }
        self.dispatch(intent.with_javascript(javascript))
    }

    // ========================================================================
    // Debugging
    // ========================================================================

    /// Dump the current body to the snapshot directory and open it.
    pub fn save_and_open(&self) -> Result<Option<PathBuf>> {
        let body = self.body().ok_or(DriverError::NoPageLoaded)?;
        Ok(self.snapshotter.save_and_open(body))
    }
}
