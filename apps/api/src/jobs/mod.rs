// Static job listings and the application form that submits against them.

pub mod catalog;
pub mod form;
pub mod handlers;
