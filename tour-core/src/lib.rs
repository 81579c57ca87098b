//! # Tour Core
//!
//! 地图相机动画编排的核心逻辑库。
//!
//! ## 架构概述
//!
//! `tour-core` 是纯逻辑核心，不做任何渲染、瓦片加载或坐标投影。
//! 它通过注入的 [`ViewDriver`] 句柄与地图引擎的相机通信：
//!
//! ```text
//! Sequencer ──► CompositeAnimation ──► ViewDriver::submit_animation
//!     ▲                  ▲                      │
//!     │   结算回调(一次)  │   step 回调(每步一次) │
//!     └──────────────────┴──────────────────────┘
//! ```
//!
//! 每个操作只有两种结果：干净完成，或被更新的请求打断。
//! 没有重试，也没有失败之外的错误路径。
//!
//! ## 核心类型
//!
//! - [`AnimationStep`]：单次视图过渡的声明式描述
//! - [`CompositeAnimation`]：并发过渡归约为单一裁决
//! - [`TourSequencer`]：按序串联组合动画，遇打断即取消
//! - [`CameraController`]：面向调用方的命名操作
//! - [`ViewDriver`]：由宿主注入的相机句柄
//!
//! ## 并发模型
//!
//! 单线程、协作式：核心从不阻塞，所有推进都发生在 Driver
//! 时间轴循环派发的回调里。同一视图上 last-writer-wins，
//! 核心没有显式取消接口，只观察 `completed == false` 信号。
//!
//! ## 模块结构
//!
//! - [`easing`]：缓动函数
//! - [`step`]：AnimationStep 与坐标类型
//! - [`driver`]：ViewDriver 接口与回调类型
//! - [`composite`]：组合动画归约
//! - [`sequencer`]：巡游状态机
//! - [`controller`]：命名相机操作

pub mod composite;
pub mod controller;
pub mod driver;
pub mod easing;
pub mod sequencer;
pub mod step;

// 重导出核心类型
pub use composite::{CompletionState, CompositeAnimation};
pub use controller::{CameraController, DEFAULT_FLY_DURATION, DEFAULT_TOUR_DELAY, fly_plan};
pub use driver::{FinishCallback, SettleCallback, StepCallback, ViewDriver};
pub use easing::EasingFunction;
pub use sequencer::{LegPlanner, TourPhase, TourSequencer};
pub use step::{AnimationStep, Coordinate, DEFAULT_STEP_DURATION};
