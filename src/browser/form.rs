use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, HtmlFormElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, MutationObserver,
    MutationObserverInit, MutationRecord,
};

use crate::config::SearchFormConfig;
use crate::error::GlueError;
use crate::model::SelectOption;
use crate::state::{FormDom, FormSynchronizer};

/// The search form fields as found in the page.
pub struct DomForm {
    primary: HtmlSelectElement,
    secondary: HtmlSelectElement,
    min_size: HtmlInputElement,
    document: Document,
    label_name: String,
}

impl DomForm {
    /// `Ok(None)` when the page has no form with the configured name.
    pub fn lookup(document: &Document, config: &SearchFormConfig) -> Result<Option<Self>, GlueError> {
        let Some(form) = document
            .forms()
            .named_item(&config.form_name)
            .and_then(|f| f.dyn_into::<HtmlFormElement>().ok())
        else {
            return Ok(None);
        };
        let field = |name: &str| {
            form.elements()
                .named_item(name)
                .ok_or_else(|| GlueError::MissingElement(name.to_string()))
        };
        Ok(Some(Self {
            primary: cast(field(&config.primary_field)?, &config.primary_field)?,
            secondary: cast(field(&config.secondary_field)?, &config.secondary_field)?,
            min_size: cast(field(&config.min_size_field)?, &config.min_size_field)?,
            document: document.clone(),
            label_name: config.label_name.clone(),
        }))
    }

    fn label(&self) -> Option<Element> {
        self.document
            .get_elements_by_name(&self.label_name)
            .item(0)
            .and_then(|n| n.dyn_into::<Element>().ok())
            .or_else(|| self.document.get_element_by_id(&self.label_name))
    }
}

impl FormDom for DomForm {
    fn primary_value(&self) -> String {
        self.primary.value()
    }

    fn secondary_value(&self) -> String {
        self.secondary.value()
    }

    fn secondary_options(&self) -> Vec<SelectOption> {
        let options = self.secondary.options();
        (0..options.length())
            .filter_map(|i| options.get_with_index(i))
            .filter_map(|o| o.dyn_into::<HtmlOptionElement>().ok())
            .map(|o| SelectOption::new(o.value(), o.text()))
            .collect()
    }

    fn secondary_selected(&self) -> Option<usize> {
        usize::try_from(self.secondary.selected_index()).ok()
    }

    fn select_secondary(&self, index: usize) {
        self.secondary.set_selected_index(index as i32);
    }

    fn set_min_size(&self, value: u32, enabled: bool) {
        self.min_size.set_value(&value.to_string());
        self.min_size.set_disabled(!enabled);
    }

    fn set_label(&self, text: &str) -> bool {
        match self.label() {
            Some(label) => {
                label.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }
}

fn cast<T: JsCast>(el: Element, name: &str) -> Result<T, GlueError> {
    el.dyn_into::<T>()
        .map_err(|_| GlueError::MissingElement(format!("{name} has an unexpected element type")))
}

/// Live binding between the search form and its derived state.
pub struct SearchFormBinding {
    observer: MutationObserver,
    _observer_cb: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
    _listeners: Vec<EventListener>,
}

impl Drop for SearchFormBinding {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Binds the change handlers and runs one synchronization pass.
/// Returns `Ok(None)` when the page has no search form.
pub fn bind_search_form(document: &Document, config: SearchFormConfig) -> Result<Option<SearchFormBinding>, GlueError> {
    let Some(dom) = DomForm::lookup(document, &config)? else {
        log::debug!("no {} form on this page", config.form_name);
        return Ok(None);
    };
    let primary = dom.primary.clone();
    let secondary = dom.secondary.clone();
    let sync = Rc::new(RefCell::new(FormSynchronizer::new(dom, config)));

    let on_primary = {
        let sync = sync.clone();
        EventListener::new(&primary, "change", move |_| sync.borrow_mut().primary_changed())
    };
    let on_secondary = {
        let sync = sync.clone();
        EventListener::new(&secondary, "change", move |_| sync.borrow_mut().secondary_changed())
    };

    let observer_cb = {
        let sync = sync.clone();
        Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
            let touched = records
                .iter()
                .filter_map(|r| r.dyn_into::<MutationRecord>().ok())
                .any(|r| r.type_() == "childList");
            if touched {
                sync.borrow_mut().options_changed();
            }
        }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>)
    };
    let observer = MutationObserver::new(observer_cb.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    observer.observe_with_options(&secondary, &init)?;

    // initial pass mirrors the primary selection, as a change event would
    sync.borrow_mut().primary_changed();
    log::info!("search form synchronizer bound");

    Ok(Some(SearchFormBinding {
        observer,
        _observer_cb: observer_cb,
        _listeners: vec![on_primary, on_secondary],
    }))
}

thread_local! {
    static BINDING: RefCell<Option<SearchFormBinding>> = const { RefCell::new(None) };
}

/// Binds the page's search form, replacing any earlier binding.
pub fn install(document: &Document, config: SearchFormConfig) -> Result<bool, GlueError> {
    let binding = bind_search_form(document, config)?;
    let bound = binding.is_some();
    BINDING.with(|b| *b.borrow_mut() = binding);
    Ok(bound)
}
