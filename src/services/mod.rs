pub mod navigation;
pub mod normalize;
pub mod publish;
pub mod session;
pub mod viewer;
