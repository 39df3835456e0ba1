use std::path::{Component, Path, PathBuf};

/// Expand a directory string into the absolute form patterns are matched on.
///
/// `~` and `~/...` use the home directory, relative paths are joined onto
/// `cwd`, and `.`/`..` components are removed lexically (symlinks are not
/// followed). Anything else, remote prefixes included, is kept as text.
pub fn expand_directory(directory: &str, cwd: &Path) -> String {
	let expanded = expand_tilde(directory);
	let absolute = if expanded.is_absolute() {
		expanded
	} else {
		cwd.join(expanded)
	};
	normalize(&absolute).to_string_lossy().into_owned()
}

fn expand_tilde(directory: &str) -> PathBuf {
	let rest = if directory == "~" {
		Some("")
	} else {
		directory.strip_prefix("~/")
	};

	match (rest, dirs::home_dir()) {
		(Some(rest), Some(home)) if rest.is_empty() => home,
		(Some(rest), Some(home)) => home.join(rest),
		_ => PathBuf::from(directory),
	}
}

fn normalize(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				normalized.pop();
			}
			other => normalized.push(other.as_os_str()),
		}
	}
	normalized
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;

	#[test]
	fn test_absolute_path_unchanged() {
		assert_eq!(
			expand_directory("/home/user/project1", Path::new("/")),
			"/home/user/project1"
		);
	}

	#[test]
	fn test_relative_path_joined_onto_cwd() {
		assert_eq!(
			expand_directory("subdir", Path::new("/home/user/project1")),
			"/home/user/project1/subdir"
		);
	}

	#[test]
	fn test_dot_components_removed() {
		assert_eq!(
			expand_directory("./a/../b/.", Path::new("/srv")),
			"/srv/b"
		);
		assert_eq!(expand_directory("/srv/app/..", Path::new("/")), "/srv");
	}

	#[test]
	fn test_parent_of_root_stays_root() {
		assert_eq!(expand_directory("/..", Path::new("/")), "/");
	}

	#[test]
	fn test_trailing_slash_dropped() {
		assert_eq!(expand_directory("/srv/app/", Path::new("/")), "/srv/app");
	}

	#[test]
	fn test_tilde_expansion() {
		let home = dirs::home_dir().unwrap();
		assert_eq!(
			expand_directory("~", Path::new("/")),
			home.to_string_lossy()
		);
		assert_eq!(
			expand_directory("~/code", Path::new("/")),
			home.join("code").to_string_lossy()
		);
	}

	#[test]
	fn test_tilde_user_form_left_alone() {
		assert_eq!(
			expand_directory("~other/code", Path::new("/base")),
			"/base/~other/code"
		);
	}

	#[test]
	fn test_remote_prefix_kept_as_text() {
		assert_eq!(
			expand_directory("/ssh:build:/srv/app", Path::new("/")),
			"/ssh:build:/srv/app"
		);
	}
}
