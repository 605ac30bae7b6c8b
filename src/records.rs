//! 运行统计：按 key 保存数值序列，定期输出摘要。

use std::collections::BTreeMap;

use crate::error::{EnvError, Result};

#[derive(Debug, Clone, Default)]
pub struct Records {
    name: String,
    records: BTreeMap<String, Vec<f64>>,
    stdout_interval: Option<usize>,
    /// 每次提交必须至少包含其中一个 key
    stdout_indices: Vec<String>,
}

impl Records {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 每 `interval` 次提交输出一次最近 `interval` 条的摘要
    pub fn with_stdout(mut self, interval: usize, indices: &[&str]) -> Self {
        self.stdout_interval = Some(interval.max(1));
        self.stdout_indices = indices.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 追加一条记录，返回最长序列的长度
    pub fn submit<'a, I>(&mut self, entry: I) -> Result<usize>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let entry: Vec<_> = entry.into_iter().collect();
        if !self.stdout_indices.is_empty()
            && !entry
                .iter()
                .any(|(k, _)| self.stdout_indices.iter().any(|i| i == k))
        {
            return Err(EnvError::InvalidRecord(format!(
                "submitted record does not contain any of the required keys {:?}",
                self.stdout_indices
            )));
        }

        for (key, value) in entry {
            self.records.entry(key.to_string()).or_default().push(value);
        }
        let max_length = self.records.values().map(Vec::len).max().unwrap_or(0);

        if let Some(interval) = self.stdout_interval {
            if max_length > 0 && max_length % interval == 0 {
                self.summarize(interval);
            }
        }
        Ok(max_length)
    }

    pub fn series(&self, key: &str) -> Option<&[f64]> {
        self.records.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// key 的数量
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn summarize(&self, interval: usize) {
        tracing::info!("============ {} =============", self.name.to_uppercase());
        for (key, values) in &self.records {
            let recent = &values[values.len().saturating_sub(interval)..];
            let (Some(first), Some(last)) = (recent.first(), recent.last()) else {
                continue;
            };
            if self.stdout_indices.contains(key) {
                tracing::info!("{key}: {first}-{last}");
            } else {
                let stats = Summary::of(recent);
                tracing::info!(
                    "{key}: mean={:.4} min={:.4} max={:.4}",
                    stats.mean,
                    stats.min,
                    stats.max
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// `values` 不能为空
    pub fn of(values: &[f64]) -> Self {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self { mean, min, max }
    }
}
