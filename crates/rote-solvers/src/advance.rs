//! Forward-progress clicks. Clicking a control that already did its job is a no-op
//! on the site, so these routines hold no busy flag.

use rote_core::UiTree;

use crate::plan::Plan;
use crate::site;

/// Every enabled "Next"/"Submit" primary button
pub fn click_action_buttons(tree: &UiTree) -> Plan {
    let selector = site::action_button();
    let clicks: Vec<_> = tree
        .find_all(&selector)
        .filter(|button| !button.is_disabled() && site::is_advance_label(&button.text_content()))
        .map(|button| button.id())
        .collect();

    Plan::clicks(clicks)
}

/// The enabled arrow in the item controls
pub fn click_arrow_next(tree: &UiTree) -> Plan {
    site::arrow_next(tree)
        .map(|arrow| Plan::click(arrow.id()))
        .unwrap_or_default()
}
