use std::rc::Rc;

use yew::Reducible;

use crate::config::SearchFormConfig;
use crate::model::SelectOption;
use crate::state::search_form::{FormAction, SearchFormState, Selection};

/// Live access to the search form fields.
pub trait FormDom {
    fn primary_value(&self) -> String;
    fn secondary_value(&self) -> String;
    fn secondary_options(&self) -> Vec<SelectOption>;
    fn secondary_selected(&self) -> Option<usize>;
    fn select_secondary(&self, index: usize);
    fn set_min_size(&self, value: u32, enabled: bool);
    /// Returns `false` when the page has no label element.
    fn set_label(&self, text: &str) -> bool;
}

/// Keeps the secondary select and the min size field consistent with the
/// page's current selection. Every event re-reads the fields first.
pub struct FormSynchronizer<D: FormDom> {
    dom: D,
    state: Rc<SearchFormState>,
}

impl<D: FormDom> FormSynchronizer<D> {
    pub fn new(dom: D, config: SearchFormConfig) -> Self {
        let state = SearchFormState::new(config, dom.primary_value(), dom.secondary_value(), dom.secondary_options());
        Self {
            dom,
            state: Rc::new(state),
        }
    }

    pub fn state(&self) -> &SearchFormState {
        &self.state
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn primary_changed(&mut self) {
        let sel = self.selection();
        self.dispatch(FormAction::PrimaryChanged(sel));
    }

    pub fn secondary_changed(&mut self) {
        let sel = self.selection();
        self.dispatch(FormAction::SecondaryChanged(sel));
    }

    pub fn options_changed(&mut self) {
        let action = FormAction::OptionsChanged {
            selection: self.selection(),
            options: self.dom.secondary_options(),
        };
        self.dispatch(action);
    }

    fn selection(&self) -> Selection {
        Selection::new(self.dom.primary_value(), self.dom.secondary_value())
    }

    fn dispatch(&mut self, action: FormAction) {
        self.state = self.state.clone().reduce(action);
        self.apply();
    }

    fn apply(&self) {
        let state = &self.state;
        if let Some(pos) = state.secondary_position() {
            if self.dom.secondary_selected() != Some(pos) {
                self.dom.select_secondary(pos);
            }
        }
        self.dom.set_min_size(state.min_size.value, state.min_size.enabled);
        if let Some(text) = &state.min_size.label {
            if !self.dom.set_label(text) {
                log::debug!("no label element named {}", state.config.label_name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::{Cell, RefCell};

    struct FakeForm {
        primary: RefCell<String>,
        secondary: RefCell<String>,
        options: RefCell<Vec<SelectOption>>,
        min_size: Cell<(u32, bool)>,
        label: RefCell<Option<String>>,
        has_label: bool,
        selects: Cell<usize>,
    }

    impl FakeForm {
        fn new(primary: &str, secondary: &str) -> Self {
            Self {
                primary: RefCell::new(primary.to_string()),
                secondary: RefCell::new(secondary.to_string()),
                options: RefCell::new(vec![
                    SelectOption::new("A", "Alpha"),
                    SelectOption::new("B", "Beta"),
                    SelectOption::new("C", "Gamma"),
                ]),
                min_size: Cell::new((7, true)),
                label: RefCell::new(None),
                has_label: true,
                selects: Cell::new(0),
            }
        }
    }

    impl FormDom for FakeForm {
        fn primary_value(&self) -> String {
            self.primary.borrow().clone()
        }
        fn secondary_value(&self) -> String {
            self.secondary.borrow().clone()
        }
        fn secondary_options(&self) -> Vec<SelectOption> {
            self.options.borrow().clone()
        }
        fn secondary_selected(&self) -> Option<usize> {
            let current = self.secondary.borrow();
            self.options.borrow().iter().position(|o| o.value == *current)
        }
        fn select_secondary(&self, index: usize) {
            self.selects.set(self.selects.get() + 1);
            *self.secondary.borrow_mut() = self.options.borrow()[index].value.clone();
        }
        fn set_min_size(&self, value: u32, enabled: bool) {
            self.min_size.set((value, enabled));
        }
        fn set_label(&self, text: &str) -> bool {
            if self.has_label {
                *self.label.borrow_mut() = Some(text.to_string());
            }
            self.has_label
        }
    }

    fn bound(primary: &str, secondary: &str) -> FormSynchronizer<FakeForm> {
        let mut sync = FormSynchronizer::new(FakeForm::new(primary, secondary), SearchFormConfig::default());
        sync.primary_changed();
        sync
    }

    #[test]
    fn initial_pass_mirrors_primary_into_secondary() {
        let sync = bound("C", "A");
        let dom = sync.dom();
        assert_eq!(*dom.secondary.borrow(), "C");
        assert_eq!(dom.min_size.get(), (0, false));
        assert_eq!(dom.label.borrow().as_deref(), Some("<Not Available>"));
    }

    #[test]
    fn secondary_change_enables_min_size_with_option_text() {
        let mut sync = bound("A", "A");
        *sync.dom().secondary.borrow_mut() = "B".to_string();
        sync.secondary_changed();
        let dom = sync.dom();
        assert_eq!(dom.min_size.get(), (1, true));
        assert_eq!(dom.label.borrow().as_deref(), Some("Min Beta"));
        assert_eq!(*dom.primary.borrow(), "A");
    }

    #[test]
    fn primary_without_counterpart_keeps_secondary_selection() {
        let mut sync = bound("A", "A");
        *sync.dom().secondary.borrow_mut() = "B".to_string();
        sync.secondary_changed();
        *sync.dom().primary.borrow_mut() = "X".to_string();
        sync.primary_changed();
        let dom = sync.dom();
        assert_eq!(*dom.secondary.borrow(), "B");
        assert_eq!(dom.min_size.get(), (1, true));
    }

    #[test]
    fn removing_the_selected_option_recomputes_from_the_page() {
        let mut sync = bound("A", "A");
        *sync.dom().secondary.borrow_mut() = "B".to_string();
        sync.secondary_changed();
        assert_eq!(sync.dom().min_size.get(), (1, true));

        // the browser falls back to the first remaining option
        sync.dom().options.borrow_mut().retain(|o| o.value != "B");
        *sync.dom().secondary.borrow_mut() = "A".to_string();
        sync.options_changed();
        assert_eq!(sync.state().secondary, "A");
        assert_eq!(sync.dom().min_size.get(), (0, false));
    }

    #[test]
    fn selection_changed_by_script_is_picked_up_on_next_event() {
        let mut sync = bound("A", "A");
        *sync.dom().secondary.borrow_mut() = "C".to_string();
        *sync.dom().primary.borrow_mut() = "Z".to_string();
        sync.primary_changed();
        assert_eq!(sync.dom().min_size.get(), (1, true));
        assert_eq!(sync.dom().label.borrow().as_deref(), Some("Min Gamma"));
    }

    #[test]
    fn selected_option_is_not_reselected() {
        let sync = bound("A", "A");
        assert_eq!(sync.dom().selects.get(), 0);
    }

    #[test]
    fn missing_label_still_updates_the_field() {
        let mut form = FakeForm::new("A", "B");
        form.has_label = false;
        let mut sync = FormSynchronizer::new(form, SearchFormConfig::default());
        sync.secondary_changed();
        assert_eq!(sync.dom().min_size.get(), (1, true));
        assert_eq!(*sync.dom().label.borrow(), None);
    }
}
