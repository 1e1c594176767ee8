//! proto3 declaration emission.

pub mod decl;
pub mod enums;
pub mod messages;

pub use decl::{
    Declaration, EnumDecl, EnumMember, FieldDecl, MessageDecl, MessageItem, OneofDecl,
    XmlBinding,
};
pub use enums::EnumGenerator;
pub use messages::MessageGenerator;
