pub mod commit;
pub mod edge;
pub mod lane;
pub mod node;
