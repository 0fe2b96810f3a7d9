pub mod carousel;
pub mod dock;
pub mod scroll;
pub mod viewport;

// Geometry types in the public API come from kurbo; frontends convert at
// their own toolkit boundary.
pub use kurbo;
