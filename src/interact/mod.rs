pub mod inference;
pub mod interactable;
pub mod link;
