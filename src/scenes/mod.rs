//! Scene content: the board view, the end screen, and the mini-game round
//! wrapper with its concrete rule sets. Round internals stay thin; only the
//! win/lose result contract matters to the runtime.

pub mod board;
pub mod end;
pub mod rounds;
