// reqwest clients for the services this client talks to.

pub mod battle;

pub use battle::BattleHttpClient;
