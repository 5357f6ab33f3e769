use std::collections::HashMap;
use std::rc::Rc;

use yew::Reducible;

use crate::config::SearchFormConfig;
use crate::model::SelectOption;

/// Ordered value -> display text lookup over a select's options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionIndex {
    options: Vec<SelectOption>,
    by_value: HashMap<String, usize>,
}

impl OptionIndex {
    pub fn from_options(options: Vec<SelectOption>) -> Self {
        let mut by_value = HashMap::with_capacity(options.len());
        for (i, o) in options.iter().enumerate() {
            // first occurrence wins
            by_value.entry(o.value.clone()).or_insert(i);
        }
        Self { options, by_value }
    }

    pub fn refresh(&mut self, options: Vec<SelectOption>) {
        if options != self.options {
            *self = Self::from_options(options);
        }
    }

    pub fn position(&self, value: &str) -> Option<usize> {
        self.by_value.get(value).copied()
    }

    pub fn text_for(&self, value: &str) -> Option<&str> {
        self.position(value).map(|i| self.options[i].text.as_str())
    }
}

/// Derived state of the minimum sub-result size field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MinSizeField {
    pub value: u32,
    pub enabled: bool,
    /// `None` leaves the label text as it is.
    pub label: Option<String>,
}

pub fn recompute(primary: &str, secondary: &str, index: &OptionIndex, config: &SearchFormConfig) -> MinSizeField {
    if primary == secondary {
        MinSizeField {
            value: 0,
            enabled: false,
            label: Some(config.not_applicable.clone()),
        }
    } else {
        MinSizeField {
            value: 1,
            enabled: true,
            label: index
                .text_for(secondary)
                .map(|text| format!("{}{}", config.label_prefix, text)),
        }
    }
}

/// Both select values as read from the page when an event fires.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub primary: String,
    pub secondary: String,
}

impl Selection {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormAction {
    PrimaryChanged(Selection),
    SecondaryChanged(Selection),
    OptionsChanged {
        selection: Selection,
        options: Vec<SelectOption>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchFormState {
    pub config: SearchFormConfig,
    pub primary: String,
    pub secondary: String,
    pub secondary_options: OptionIndex,
    pub min_size: MinSizeField,
}

impl SearchFormState {
    pub fn new(config: SearchFormConfig, primary: String, secondary: String, options: Vec<SelectOption>) -> Self {
        let secondary_options = OptionIndex::from_options(options);
        let min_size = recompute(&primary, &secondary, &secondary_options, &config);
        Self {
            config,
            primary,
            secondary,
            secondary_options,
            min_size,
        }
    }

    /// Position of the secondary option currently selected, if it exists.
    pub fn secondary_position(&self) -> Option<usize> {
        self.secondary_options.position(&self.secondary)
    }

    fn take_selection(&mut self, sel: Selection) {
        self.primary = sel.primary;
        self.secondary = sel.secondary;
    }

    fn mirror_primary(&mut self) {
        if self.secondary_options.position(&self.primary).is_some() {
            self.secondary = self.primary.clone();
        }
    }

    fn refresh_min_size(&mut self) {
        self.min_size = recompute(&self.primary, &self.secondary, &self.secondary_options, &self.config);
    }
}

impl Reducible for SearchFormState {
    type Action = FormAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use FormAction::*;
        let mut new = (*self).clone();
        match action {
            PrimaryChanged(sel) => {
                new.take_selection(sel);
                new.mirror_primary();
            }
            SecondaryChanged(sel) => {
                new.take_selection(sel);
            }
            OptionsChanged { selection, options } => {
                new.take_selection(selection);
                new.secondary_options.refresh(options);
            }
        }
        new.refresh_min_size();
        if new == *self {
            return self;
        }
        Rc::new(new)
    }
}
