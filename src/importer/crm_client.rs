// ==========================================
// 餐饮人力排班系统 - CRM 订单拉取
// ==========================================
// 职责: 定义上游 CRM 协作方接口，并提供 JSON 文件实现
// 约定: 返回的记录视为已校验；重试由调用方负责，流水线内部不重试
// ==========================================

use crate::domain::demand::{BeoInput, ReoInput};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

// ==========================================
// CrmClient Trait
// ==========================================
// 实现者: JsonFileCrmClient / StaticCrmClient
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// 拉取宴会订单
    async fn fetch_beos(&self) -> ImportResult<Vec<BeoInput>>;

    /// 拉取餐厅活动订单
    async fn fetch_reos(&self) -> ImportResult<Vec<ReoInput>>;
}

/// CRM 导出文件结构
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmExport {
    #[serde(default)]
    pub beos: Vec<BeoInput>,
    #[serde(default)]
    pub reos: Vec<ReoInput>,
}

// ==========================================
// JsonFileCrmClient - 读取 CRM 导出 JSON
// ==========================================
pub struct JsonFileCrmClient {
    path: PathBuf,
}

impl JsonFileCrmClient {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn load(&self) -> ImportResult<CrmExport> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ImportError::FileNotFound(self.path.display().to_string()),
                _ => ImportError::FileReadError(format!("{}: {}", self.path.display(), e)),
            })?;
        let export: CrmExport = serde_json::from_str(&raw)?;
        debug!(
            path = %self.path.display(),
            beos = export.beos.len(),
            reos = export.reos.len(),
            "CRM 导出文件解析完成"
        );
        Ok(export)
    }
}

#[async_trait]
impl CrmClient for JsonFileCrmClient {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_beos(&self) -> ImportResult<Vec<BeoInput>> {
        let beos = self.load().await?.beos;
        info!(count = beos.len(), "宴会订单拉取完成");
        Ok(beos)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_reos(&self) -> ImportResult<Vec<ReoInput>> {
        let reos = self.load().await?.reos;
        info!(count = reos.len(), "餐厅活动订单拉取完成");
        Ok(reos)
    }
}

// ==========================================
// StaticCrmClient - 内存数据源
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticCrmClient {
    export: CrmExport,
}

impl StaticCrmClient {
    pub fn new(beos: Vec<BeoInput>, reos: Vec<ReoInput>) -> Self {
        Self {
            export: CrmExport { beos, reos },
        }
    }
}

#[async_trait]
impl CrmClient for StaticCrmClient {
    async fn fetch_beos(&self) -> ImportResult<Vec<BeoInput>> {
        Ok(self.export.beos.clone())
    }

    async fn fetch_reos(&self) -> ImportResult<Vec<ReoInput>> {
        Ok(self.export.reos.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_json_file_client_reads_both_lists() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "beos": [{{"id": "B1", "date": "2026-03-02", "guest_count": 120, "menu_complexity": "high"}}],
                "reos": [{{"id": "R1", "outlet_id": "OUT1", "date": "2026-03-02", "guest_count": 40,
                          "menu_complexity": "low", "required_skills": ["server"]}}]
            }}"#
        )
        .unwrap();

        let client = JsonFileCrmClient::new(file.path());
        let beos = client.fetch_beos().await.unwrap();
        let reos = client.fetch_reos().await.unwrap();

        assert_eq!(beos.len(), 1);
        assert_eq!(beos[0].guest_count, 120);
        assert_eq!(reos[0].outlet_id, "OUT1");
        assert!(reos[0].required_skills.contains("server"));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let client = JsonFileCrmClient::new("/nonexistent/crm_export.json");
        let err = client.fetch_beos().await.unwrap_err();
        assert!(matches!(err, ImportError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = JsonFileCrmClient::new(file.path()).fetch_reos().await.unwrap_err();
        assert!(matches!(err, ImportError::ParseError(_)));
    }
}
