pub mod coordinator;
pub mod form_sync;
pub mod markers;
pub mod search_form;

pub use coordinator::{CancelToken, PopupCoordinator, PopupHost, PopupState, PopupWindow};
pub use form_sync::{FormDom, FormSynchronizer};
pub use markers::{MapWidget, MarkerSurface};
pub use search_form::{FormAction, MinSizeField, OptionIndex, SearchFormState, Selection};
