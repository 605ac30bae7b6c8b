pub mod cartpole;
pub mod puddleworld;

pub use cartpole::{CartPoleContinuous, CartPoleEnv, CartPoleSwingUp, CartPoleSwingUpContinuous};
pub use puddleworld::{ContinuousPuddleWorld, PlanarEnv, PuddleWorld};
