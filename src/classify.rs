use std::collections::BTreeSet;

use crate::model::types::{FileEntry, FileKind, RoleEntry};

/// Files of a role split by kind. `file_paths` and `files` are parallel and
/// only hold plain files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified {
    pub file_paths: Vec<Option<String>>,
    pub files: Vec<FileEntry>,
    pub bundle_files: Vec<FileEntry>,
    pub packages: Vec<FileEntry>,
}

impl Classified {
    /// Unique parent directories of all plain files that have a path.
    pub fn directories(&self) -> Vec<String> {
        self.file_paths
            .iter()
            .flatten()
            .map(|p| dirname(p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub fn classify(role: &RoleEntry) -> Classified {
    let mut classified = Classified::default();

    for file in &role.files {
        match file.kind() {
            FileKind::Package => classified.packages.push(file.clone()),
            FileKind::Bundle => classified.bundle_files.push(file.clone()),
            FileKind::Plain => {
                classified.file_paths.push(file.path().map(str::to_string));
                classified.files.push(file.clone());
            }
        }
    }

    classified
}

/// POSIX dirname: everything before the last `/`, without trailing slashes
/// unless the result is the root itself.
fn dirname(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => {
            let head = &path[..=idx];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() {
                head.to_string()
            } else {
                trimmed.to_string()
            }
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_model;
    use pretty_assertions::assert_eq;

    fn role(content: &str) -> RoleEntry {
        parse_model(content).unwrap().roles.remove(0)
    }

    #[test]
    fn test_classify() {
        let role = role(
            r#"
roles:
  - role: aem-cms
    files:
      - path: /opt/aem/install/app.zip
        aemContentPackageProperties: {group: app}
        bundleFileProperties: {bundleName: app}
      - path: /opt/aem/install/core.jar
        bundleFileProperties: {bundleName: core}
      - path: /opt/aem/conf/aem.conf
      - modelOptions: {}
      - path: /opt/aem/conf/logback.xml
"#,
        );
        let classified = classify(&role);

        assert_eq!(classified.packages.len(), 1);
        assert_eq!(classified.packages[0].path(), Some("/opt/aem/install/app.zip"));
        assert_eq!(classified.bundle_files.len(), 1);
        assert_eq!(classified.bundle_files[0].path(), Some("/opt/aem/install/core.jar"));

        assert_eq!(
            classified.file_paths,
            vec![
                Some("/opt/aem/conf/aem.conf".to_string()),
                None,
                Some("/opt/aem/conf/logback.xml".to_string()),
            ]
        );
        assert_eq!(classified.files.len(), classified.file_paths.len());
        for (path, file) in classified.file_paths.iter().zip(&classified.files) {
            assert_eq!(path.as_deref(), file.path());
        }
    }

    #[test]
    fn test_directories() {
        let role = role(
            r#"
roles:
  - role: web
    files:
      - path: /opt/a/x
      - path: /opt/a/y
      - path: /opt/b/z
      - modelOptions: {}
"#,
        );
        let classified = classify(&role);
        assert_eq!(classified.directories(), vec!["/opt/a", "/opt/b"]);
    }

    #[test]
    fn test_directories_ignore_packages_and_bundles() {
        let role = role(
            r#"
roles:
  - role: aem
    files:
      - path: /opt/packages/app.zip
        aemContentPackageProperties: {}
      - path: /opt/bundles/core.jar
        bundleFileProperties: {}
"#,
        );
        let classified = classify(&role);
        assert!(classified.file_paths.is_empty());
        assert!(classified.directories().is_empty());
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/opt/a/x"), "/opt/a");
        assert_eq!(dirname("/x"), "/");
        assert_eq!(dirname("x"), "");
        assert_eq!(dirname("/opt/a//x"), "/opt/a");
        assert_eq!(dirname("/opt/a/"), "/opt/a");
        assert_eq!(dirname("conf/app.conf"), "conf");
    }
}
