pub mod validation_handlers;
