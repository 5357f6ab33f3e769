use web_sys::Element;
use yew::prelude::*;

use crate::browser::map_popup;
use crate::config::PopupConfig;

#[derive(Properties, PartialEq, Clone)]
pub struct MapWindowProps {
    #[prop_or_default]
    pub config: PopupConfig,
}

/// Root view of the map popup document.
#[function_component(MapWindow)]
pub fn map_window(props: &MapWindowProps) -> Html {
    let map_ref = use_node_ref();

    {
        let map_ref = map_ref.clone();
        let config = props.config.clone();
        use_effect_with((), move |_| {
            let session = map_ref.cast::<Element>().and_then(|container| {
                map_popup::start(&container, &config)
                    .map_err(|err| log::warn!("map window failed to start: {err}"))
                    .ok()
            });
            move || drop(session)
        });
    }

    html! {
        <div id="theMap" ref={map_ref} style="position:absolute; inset:0;"></div>
    }
}
