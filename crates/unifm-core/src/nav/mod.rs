//! Navigation list for the unified file browser.
//!
//! This module contains the navigation composer ([`roots::compose_navigation`]),
//! user [`shortcuts::Shortcuts`], and the registered [`apps::AndroidApp`]s.

pub mod apps;
pub mod roots;
pub mod shortcuts;

use crate::context::Context;
use crate::state::State;

/// Returns `state` with its navigation list recomposed.
pub fn refresh(state: State, ctx: &Context) -> State {
    let navigation = roots::compose_navigation(&state, ctx);
    State { navigation, ..state }
}
