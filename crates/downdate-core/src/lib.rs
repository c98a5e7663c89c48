mod fsutil;
mod update_file;
mod winpath;

pub use fsutil::{files_byte_equal, path_exists, read_file_bytes};
pub use update_file::UpdateFile;
pub use winpath::{
    expand_environment_strings, expand_path_variables, file_name_component, normalize_windows_path,
    paths_equal_ignore_case,
};
