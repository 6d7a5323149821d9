use std::path::PathBuf;

use crate::request::CallRequest;
use crate::resolver::ClipResolver;

/// Fixed announcement phrases, usable as clip-map symbols.
pub mod phrases {
    pub const CHIME: &str = "chime";
    pub const PLEASE: &str = "please";
    pub const CUSTOMER_NUMBER: &str = "customer-number";
    pub const PROCEED_TO: &str = "proceed-to";
    pub const WINDOW_NUMBER: &str = "window-number";
    pub const LOBBY_MANAGER: &str = "lobby-manager";
    pub const COUNTER_NUMBER: &str = "counter-number";
    pub const PRE_FILL_MACHINE: &str = "pre-fill-machine";
    pub const SELF_SERVICE_AREA: &str = "self-service-area";
}

/// Build the ordered symbol list for a call request.
///
/// Pure and total. The per-character decomposition keeps the left-to-right
/// order of the original string; that order is the audible word order of
/// the announcement and must never be rearranged.
pub fn build_symbols(request: &CallRequest) -> Vec<String> {
    let mut symbols = Vec::new();

    match request {
        CallRequest::Normal {
            queue_number,
            window_number,
            chime,
        } => {
            if *chime {
                symbols.push(phrases::CHIME.to_string());
            }
            symbols.push(phrases::PLEASE.to_string());
            symbols.extend(queue_number.chars().map(|c| c.to_string()));
            symbols.push(phrases::CUSTOMER_NUMBER.to_string());
            symbols.push(phrases::PROCEED_TO.to_string());
            symbols.extend(window_number.chars().map(|c| c.to_string()));
            symbols.push(phrases::WINDOW_NUMBER.to_string());
        }
        CallRequest::Manager {
            window_number,
            chime,
        } => {
            if *chime {
                symbols.push(phrases::CHIME.to_string());
            }
            symbols.push(phrases::LOBBY_MANAGER.to_string());
            symbols.extend(window_number.chars().map(|c| c.to_string()));
            symbols.push(phrases::WINDOW_NUMBER.to_string());
        }
    }

    symbols
}

/// Build the clip sequence for a call request, resolving each symbol to a
/// path. Symbols without a mapping are dropped; the rest keep their order.
pub fn build(request: &CallRequest, resolver: &ClipResolver) -> Vec<PathBuf> {
    build_symbols(request)
        .iter()
        .filter_map(|symbol| resolver.resolve(symbol))
        .collect()
}
