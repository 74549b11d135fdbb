pub mod json;
pub mod path;

pub use json::{is_escaped, strip_json_comments, strip_json_comments_default, StripOptions};
pub use path::{exec_dir, exec_name, exec_path, file_name, resolve_against, resolve_exec_path};

#[cfg(test)]
mod tests;
