//! UI Components
//!
//! Views and reusable Leptos components.

mod deal_detail;
mod deal_form;
mod deal_list;
mod delete_confirm_button;
mod login_page;
mod nav_bar;
mod note_dialog;
mod stage_dialog;
mod toast_host;
mod user_admin;

pub use deal_detail::DealDetail;
pub use deal_form::{DealEditForm, DealForm};
pub use deal_list::DealList;
pub use delete_confirm_button::DeleteConfirmButton;
pub use login_page::LoginPage;
pub use nav_bar::NavBar;
pub use note_dialog::NoteDialog;
pub use stage_dialog::{StageBadge, StageDialog};
pub use toast_host::ToastHost;
pub use user_admin::{CreateUserForm, UserList};
