//! # Host CLI
//!
//! `tour-core` 的无头演示宿主。
//!
//! 核心假设存在一个外部地图引擎的相机（View Driver）；
//! 这里用 [`SimulatedView`](sim_view::SimulatedView) 代替它：
//! 一个自己推进时间轴、支持属性级抢占的模拟相机。
//! 宿主负责主循环、配置加载与日志，不包含任何编排逻辑。

pub mod config;
pub mod sim_view;

pub use config::{ConfigError, TourConfig, TourStop};
pub use sim_view::SimulatedView;
