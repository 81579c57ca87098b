//! # Config 模块
//!
//! 巡游配置：站点列表与时长参数。
//!
//! ## 配置优先级
//!
//! 1. 命令行指定的配置文件（JSON）
//! 2. 内置默认巡游（伦敦 → 伯尔尼 → 罗马 → 莫斯科 → 伊斯坦布尔）

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tour_core::Coordinate;

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 读取文件失败
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 解析失败
    #[error("解析配置文件失败: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 巡游站点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourStop {
    /// 站点名称（仅用于日志展示）
    pub name: String,
    /// 视图空间坐标（投影由地图引擎决定，模拟器原样使用）
    pub coord: Coordinate,
}

/// 初始视图状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitialView {
    pub center: Coordinate,
    pub zoom: f64,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            center: ISTANBUL,
            zoom: 6.0,
        }
    }
}

/// 巡游配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    /// 巡游站点，按访问顺序排列
    #[serde(default = "default_stops")]
    pub stops: Vec<TourStop>,

    /// 单次飞行时长（毫秒）
    #[serde(default = "default_fly_duration_ms")]
    pub fly_duration_ms: u64,

    /// 站与站之间的停顿（毫秒）
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,

    /// 初始视图
    #[serde(default)]
    pub initial: InitialView,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            stops: default_stops(),
            fly_duration_ms: default_fly_duration_ms(),
            step_delay_ms: default_step_delay_ms(),
            initial: InitialView::default(),
        }
    }
}

impl TourConfig {
    /// 从 JSON 文件加载配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// 单次飞行时长
    pub fn fly_duration(&self) -> Duration {
        Duration::from_millis(self.fly_duration_ms)
    }

    /// 站间停顿
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    /// 站点坐标列表
    pub fn locations(&self) -> Vec<Coordinate> {
        self.stops.iter().map(|stop| stop.coord).collect()
    }
}

const LONDON: Coordinate = Coordinate::new(-0.12755, 51.507222);
const MOSCOW: Coordinate = Coordinate::new(37.6178, 55.7517);
const ISTANBUL: Coordinate = Coordinate::new(28.9744, 41.0128);
const ROME: Coordinate = Coordinate::new(12.5, 41.9);
const BERN: Coordinate = Coordinate::new(7.4458, 46.95);

fn default_fly_duration_ms() -> u64 {
    2000
}

fn default_step_delay_ms() -> u64 {
    750
}

fn default_stops() -> Vec<TourStop> {
    [
        ("London", LONDON),
        ("Bern", BERN),
        ("Rome", ROME),
        ("Moscow", MOSCOW),
        ("Istanbul", ISTANBUL),
    ]
    .into_iter()
    .map(|(name, coord)| TourStop {
        name: name.to_string(),
        coord,
    })
    .collect()
}
