//! Post editor: create, edit and delete handlers with their form handling.

mod forms;
mod handlers;
mod validators;

pub(crate) use handlers::{
    delete_post, edit_post_form, edit_post_submit, new_post_form, new_post_submit,
};
