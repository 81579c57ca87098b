//! # Driver 模块
//!
//! View Driver 接口定义。
//!
//! View Driver 是外部协作者（地图引擎的相机）：它接收一批
//! [`AnimationStep`]，负责推进时间轴，并通过回调报告每个 step
//! 是自然走完（`true`）还是被更新的请求打断（`false`）。
//!
//! ## 契约
//!
//! - 一次 `submit_animation` 提交的多个 step 作为同一条时间轴
//!   依次执行（前一个走完后下一个才开始）。
//! - 回调对批内每个 step 恰好触发一次。
//! - 同一视图上新提交的动画会抢占仍在进行、且涉及相同属性的
//!   旧动画（last-writer-wins），被抢占的 step 收到 `false`。
//! - 核心自身从不阻塞：所有方法注册回调后立即返回。

use std::rc::Rc;
use std::time::Duration;

use crate::step::{AnimationStep, Coordinate};

/// 单个 step 的完成回调
///
/// 参数为 `completed`：`true` 表示时间轴自然走完，`false` 表示被打断。
/// 同一回调会被批内多个 step 共享，因此是 `Rc<dyn Fn>`。
pub type StepCallback = Rc<dyn Fn(bool)>;

/// 组合动画的结算回调（恰好触发一次）
pub type SettleCallback = Box<dyn FnOnce(bool)>;

/// 巡游整体结束回调（恰好触发一次）
pub type FinishCallback = Box<dyn FnOnce(bool)>;

/// View Driver 接口
///
/// 由宿主层注入，核心通过该句柄驱动相机并查询当前状态。
/// 单线程协作式模型：实现方在自己的时间轴循环里派发回调。
pub trait ViewDriver {
    /// 当前视图中心
    fn center(&self) -> Coordinate;

    /// 当前缩放级别
    fn zoom(&self) -> f64;

    /// 当前旋转角（弧度）
    fn rotation(&self) -> f64;

    /// 提交一批动画 step
    ///
    /// 批内 step 作为一条时间轴顺序执行；`callback` 对每个 step
    /// 恰好触发一次。
    fn submit_animation(&self, steps: &[AnimationStep], callback: Option<StepCallback>);

    /// 在 `delay` 之后调用 `callback`
    ///
    /// 定时同样来自 Driver 的时间轴循环，核心不自己计时。
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>);
}
