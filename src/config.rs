use crate::error::{JudgeError, Result};
use crate::types::config::JudgeConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "judge.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".judge/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/agent-judge/config.toml";

pub fn load_config(root: &Path) -> Result<Option<JudgeConfig>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<JudgeConfig>> {
    let repo_path = root.join(DEFAULT_CONFIG_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: JudgeConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| JudgeError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(Some(cfg))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| JudgeError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::scoring::{Criterion, Intent};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_returns_none_when_repo_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert!(cfg.is_none());
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[engine]
reward_scale = 4.0
penalty_scale = 7.0

[service]
agent_version = "global"
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[engine]
penalty_scale = 6.5
default_intent = "explainer"

[necessity.hard_news]
multidisciplinarity = 0.6
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".judge")).expect("local judge dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[service]
agent_version = "local"
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged config should exist");

        let params = cfg.accrual_params();
        assert_eq!(params.reward_scale, 4.0);
        assert_eq!(params.penalty_scale, 6.5);
        assert_eq!(cfg.default_intent(), Intent::Explainer);
        assert_eq!(cfg.agent_version(), "local");
        assert_eq!(
            cfg.necessity_overrides()
                .get(&Intent::HardNews)
                .and_then(|row| row.get(&Criterion::Multidisciplinarity))
                .copied(),
            Some(0.6)
        );
    }

    #[test]
    fn load_config_rejects_invalid_merged_values() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[engine]
harm_floor = 2.0
"#,
        )
        .expect("repo config should write");

        let err = load_config_with_global(root.path(), None).expect_err("load should fail");
        assert!(matches!(err, JudgeError::ConfigParse(_)));
    }

    #[test]
    fn load_config_reports_path_on_syntax_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[engine\nbroken")
            .expect("repo config should write");

        let err = load_config_with_global(root.path(), None).expect_err("load should fail");
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }
}
