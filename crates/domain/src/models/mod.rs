pub mod academic_level;
pub mod blog;
pub mod consumption;
pub mod course;
pub mod customer;
pub mod document;
pub mod email;
pub mod faq;
pub mod notification;
pub mod operation;
pub mod product;
pub mod service;
pub mod staff;
pub mod template;
pub mod transaction;
pub mod user;
