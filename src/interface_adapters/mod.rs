// Interface adapters: wire protocol, HTTP client and terminal text handling.

pub mod clients;
pub mod input;
pub mod protocol;
pub mod render;
