pub mod artwork;
pub mod controller;
pub mod state;

pub use artwork::{decode_artwork, ArtworkLoader};
pub use controller::GameController;
pub use state::{AnswerOutcome, GameSnapshot, ItemView, RoundState, RoundStatus};
