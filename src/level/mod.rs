pub mod choreographer;
pub mod move_index;
pub mod projection;
pub mod replay_actor;
