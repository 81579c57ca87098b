//! # Controller 模块
//!
//! 面向调用方的相机操作集合：旋转、平移、飞行、巡游。
//!
//! 所有操作都立即返回；完成或取消只通过回调报告，绝不通过
//! 返回值。单发操作（旋转、平移）不关心结算结果，发出即忘。

use std::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;
use std::time::Duration;

use crate::composite::CompositeAnimation;
use crate::driver::{FinishCallback, SettleCallback, ViewDriver};
use crate::easing::EasingFunction;
use crate::sequencer::{LegPlanner, TourSequencer};
use crate::step::{AnimationStep, Coordinate};

/// 平移与飞行的默认时长
pub const DEFAULT_FLY_DURATION: Duration = Duration::from_millis(2000);

/// 巡游中站与站之间的默认停顿
pub const DEFAULT_TOUR_DELAY: Duration = Duration::from_millis(750);

/// 相机控制器
///
/// 持有注入的 View Driver 句柄，把命名操作翻译成组合动画。
pub struct CameraController {
    view: Rc<dyn ViewDriver>,
    fly_duration: Duration,
    tour_delay: Duration,
}

impl CameraController {
    /// 创建控制器，使用默认时长
    pub fn new(view: Rc<dyn ViewDriver>) -> Self {
        Self {
            view,
            fly_duration: DEFAULT_FLY_DURATION,
            tour_delay: DEFAULT_TOUR_DELAY,
        }
    }

    /// 设置平移/飞行时长
    pub fn with_fly_duration(mut self, duration: Duration) -> Self {
        self.fly_duration = duration;
        self
    }

    /// 设置巡游站间停顿
    pub fn with_tour_delay(mut self, delay: Duration) -> Self {
        self.tour_delay = delay;
        self
    }

    /// 左转 90°（发出即忘）
    pub fn rotate_left(&self) {
        self.rotate_by(FRAC_PI_2);
    }

    /// 右转 90°（发出即忘）
    pub fn rotate_right(&self) {
        self.rotate_by(-FRAC_PI_2);
    }

    /// 相对当前旋转角转动 `delta` 弧度
    fn rotate_by(&self, delta: f64) {
        let step = AnimationStep::new().with_rotation(self.view.rotation() + delta);
        self.view.submit_animation(&[step], None);
    }

    /// 平移到目标点（发出即忘，Driver 默认曲线）
    pub fn pan_to(&self, target: Coordinate) {
        let step = AnimationStep::new()
            .with_center(target)
            .with_duration(self.fly_duration);
        self.view.submit_animation(&[step], None);
    }

    /// 以指定缓动曲线平移到目标点（发出即忘）
    pub fn eased_pan_to(&self, target: Coordinate, easing: EasingFunction) {
        let step = AnimationStep::new()
            .with_center(target)
            .with_duration(self.fly_duration)
            .with_easing(easing);
        self.view.submit_animation(&[step], None);
    }

    /// 边旋转一整圈边移动到目标点（发出即忘）
    ///
    /// Driver 的旋转插值走最短弧，直接请求 2π 会被修正为原地不动，
    /// 所以拆成两段 π 提交为同一条时间轴。
    pub fn spin_to(&self, target: Coordinate) {
        let center = self.view.center();
        let first = AnimationStep::new()
            .with_center(center.midpoint(target))
            .with_rotation(PI)
            .with_easing(EasingFunction::EaseIn);
        let second = AnimationStep::new()
            .with_center(target)
            .with_rotation(2.0 * PI)
            .with_easing(EasingFunction::EaseOut);
        self.view.submit_animation(&[first, second], None);
    }

    /// 绕锚点旋转一整圈（发出即忘）
    ///
    /// 与 [`spin_to`](Self::spin_to) 相同的两段式最短弧规避。
    pub fn rotate_around(&self, anchor: Coordinate) {
        let rotation = self.view.rotation();
        let first = AnimationStep::new()
            .with_rotation(rotation + PI)
            .with_anchor(anchor)
            .with_easing(EasingFunction::EaseIn);
        let second = AnimationStep::new()
            .with_rotation(rotation + 2.0 * PI)
            .with_anchor(anchor)
            .with_easing(EasingFunction::EaseOut);
        self.view.submit_animation(&[first, second], None);
    }

    /// 飞往目标点：平移的同时缩小一级再放回
    ///
    /// `on_done` 在组合动画结算时恰好触发一次：全部走完为 `true`，
    /// 任一部分被打断为 `false`。
    pub fn fly_to(&self, target: Coordinate, on_done: SettleCallback) {
        fly_plan(&self.view, target, self.fly_duration).issue(&self.view, on_done);
    }

    /// 依次飞越一串站点
    ///
    /// 上一站干净完成才前进；任何一站被打断则整条巡游取消。
    /// `on_finished` 恰好触发一次。
    pub fn run_tour(&self, locations: Vec<Coordinate>, on_finished: FinishCallback) {
        let fly_duration = self.fly_duration;
        let planner: LegPlanner =
            Rc::new(move |view, target| fly_plan(view, target, fly_duration));

        TourSequencer::new(Rc::clone(&self.view), planner, self.tour_delay)
            .run(locations, on_finished);
    }
}

/// 规划一次飞行：平移批次 + 两段式缩放批次
///
/// 以发起时刻的缩放级别为基准：前半程缩小一级，后半程放回。
pub fn fly_plan(
    view: &Rc<dyn ViewDriver>,
    target: Coordinate,
    duration: Duration,
) -> CompositeAnimation {
    let zoom = view.zoom();
    let half = duration / 2;

    CompositeAnimation::new(vec![
        vec![
            AnimationStep::new()
                .with_center(target)
                .with_duration(duration),
        ],
        vec![
            AnimationStep::new().with_zoom(zoom - 1.0).with_duration(half),
            AnimationStep::new().with_zoom(zoom).with_duration(half),
        ],
    ])
}
