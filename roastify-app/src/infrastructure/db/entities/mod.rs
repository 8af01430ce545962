pub mod cooldown_state;
pub mod roast_event;
pub mod user;
pub mod vote;

pub use cooldown_state::Entity as CooldownState;
pub use roast_event::Entity as RoastEvent;
pub use user::Entity as User;
pub use vote::Entity as Vote;
