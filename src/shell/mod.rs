// Composition root for the project cost tracker.
//
// Responsibilities:
// - Initialise structured logging from the environment.
// - Wire a project store into the load, save and import handlers.
// - Keep the open project in memory between those calls.

pub mod logging;
pub mod session;
