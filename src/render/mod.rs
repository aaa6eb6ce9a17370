mod form;
mod page;
mod shell;
mod token;

pub use form::render_config_page;
pub use page::render_page;
pub use token::render_token;
