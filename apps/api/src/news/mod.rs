// News browsing pass-through.
// The upstream owns search ranking and taxonomy; these handlers only forward.

pub mod handlers;
