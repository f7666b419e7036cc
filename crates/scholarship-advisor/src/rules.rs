//! 规则集存储与热加载
//!
//! `RuleBook` 持有当前生效的规则集，读取只是一次原子 load；
//! 替换整套规则集是原子的，正在进行的评估继续使用旧快照。
//! `RulesFileWatcher` 监听规则文件，文件变更后经 debounce 窗口重新解析，
//! 解析失败时保留旧规则集。

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, anyhow};
use arc_swap::ArcSwap;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rule_engine::Ruleset;
use scholarship_shared::observability::metrics;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::error::{AdvisorError, Result};

/// 从文件读取并解析规则集
pub fn read_ruleset(path: &Path) -> Result<Ruleset> {
    let json = std::fs::read_to_string(path).map_err(|source| AdvisorError::RulesFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Ruleset::from_json(&json)?)
}

/// 当前生效的规则集
#[derive(Clone)]
pub struct RuleBook {
    current: Arc<ArcSwap<Ruleset>>,
    /// 规则文件路径，使用内置默认规则时为 None
    source: Option<PathBuf>,
}

impl RuleBook {
    pub fn new(ruleset: Ruleset, source: Option<PathBuf>) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(ruleset)),
            source,
        }
    }

    /// 使用内置默认规则
    pub fn with_defaults() -> Self {
        Self::new(Ruleset::default_rules(), None)
    }

    /// 加载规则集
    ///
    /// 未配置路径时使用默认规则；配置了路径但文件不存在时同样使用默认规则，
    /// 之后文件被创建会被监听器加载。文件存在但无法解析则返回错误。
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            info!("未配置规则文件，使用内置默认规则");
            return Ok(Self::with_defaults());
        };

        if !path.exists() {
            warn!(path = %path.display(), "规则文件不存在，使用内置默认规则");
            return Ok(Self::new(
                Ruleset::default_rules(),
                Some(path.to_path_buf()),
            ));
        }

        let ruleset = read_ruleset(path)?;
        info!(path = %path.display(), rules = ruleset.len(), "规则文件加载完成");
        Ok(Self::new(ruleset, Some(path.to_path_buf())))
    }

    /// 当前规则集快照
    pub fn current(&self) -> Arc<Ruleset> {
        self.current.load_full()
    }

    /// 原子替换整套规则集
    pub fn replace(&self, ruleset: Ruleset) {
        self.current.store(Arc::new(ruleset));
    }

    pub fn reset_to_defaults(&self) {
        self.replace(Ruleset::default_rules());
    }

    /// 从规则文件重新加载，失败时保留当前规则集
    pub fn reload(&self) -> Result<usize> {
        let path = self
            .source
            .as_deref()
            .ok_or_else(|| AdvisorError::Internal("未配置规则文件".to_string()))?;
        let ruleset = read_ruleset(path)?;
        let count = ruleset.len();
        self.replace(ruleset);
        Ok(count)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 规则文件监听器
///
/// 监听规则文件所在目录（编辑器通常以替换文件的方式保存），
/// 只处理目标文件的写入、创建、删除事件。drop 时停止监听。
pub struct RulesFileWatcher {
    path: PathBuf,
    shutdown_tx: watch::Sender<bool>,
    _watcher: RecommendedWatcher,
}

impl RulesFileWatcher {
    /// 启动监听，必须在 tokio runtime 内调用
    pub fn start(rule_book: RuleBook, debounce: Duration) -> anyhow::Result<Self> {
        let path = rule_book
            .source()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow!("未配置规则文件，无法监听"))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| anyhow!("规则文件路径无效: {}", path.display()))?;
        let watch_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        // notify 回调运行在它自己的线程上，事件通过 channel 转发到异步任务
        let (event_tx, mut event_rx) = mpsc::channel::<()>(16);

        let mut watcher = notify::recommended_watcher(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    let relevant = matches!(
                        event.kind,
                        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                    ) && event
                        .paths
                        .iter()
                        .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if relevant {
                        let _ = event_tx.try_send(());
                    }
                }
                Err(e) => warn!(error = %e, "规则文件监听事件错误"),
            },
        )
        .context("创建规则文件监听器失败")?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .context("启动规则文件监听失败")?;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let watched = path.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(()) = event_rx.recv() => {
                        // debounce 窗口内的后续事件合并为一次重载
                        tokio::time::sleep(debounce).await;
                        while event_rx.try_recv().is_ok() {}

                        match rule_book.reload() {
                            Ok(count) => {
                                info!(path = %watched.display(), rules = count, "规则文件变更，已重新加载");
                                metrics::record_ruleset_reload("file", "success");
                            }
                            Err(e) => {
                                error!(
                                    path = %watched.display(),
                                    error = %e,
                                    "规则文件重新加载失败，保留当前规则集"
                                );
                                metrics::record_ruleset_reload("file", "failure");
                            }
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!(path = %watched.display(), "规则文件监听已停止");
                            break;
                        }
                    }
                }
            }
        });

        info!(path = %path.display(), debounce_ms = debounce.as_millis() as u64, "规则文件监听已启动");

        Ok(Self {
            path,
            shutdown_tx,
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for RulesFileWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
