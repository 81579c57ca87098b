//! # SimView 模块
//!
//! 模拟的 View Driver：在没有真实地图引擎的情况下充当相机，
//! 自己推进时间轴并派发 step 回调。
//!
//! ## 语义
//!
//! - 一次提交的多个 step 作为一条链顺序执行，每个 step 开始时
//!   捕获当时的相机状态作为插值起点。
//! - 属性级抢占（last-writer-wins）：新提交触及 center / zoom /
//!   rotation 中的某个属性时，仍在进行且触及同一属性的旧链被
//!   打断，其所有未回报的 step 收到 `false`。
//! - 带锚点的旋转会同时带动中心点绕锚点公转。
//! - 未指定缓动时采用 EaseInOut，未指定时长时采用
//!   `DEFAULT_STEP_DURATION`（1 秒）。

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use tracing::{debug, trace};

use tour_core::{AnimationStep, Coordinate, EasingFunction, StepCallback, ViewDriver};

/// 一条链触及的属性集合
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PropertySet {
    center: bool,
    zoom: bool,
    rotation: bool,
}

impl PropertySet {
    /// 一批 step 触及的属性并集
    fn of_steps(steps: &[AnimationStep]) -> Self {
        let mut set = Self::default();
        for step in steps {
            // 锚点旋转会移动中心点
            set.center |= step.center.is_some() || step.anchor.is_some();
            set.zoom |= step.zoom.is_some();
            set.rotation |= step.rotation.is_some();
        }
        set
    }

    fn overlaps(&self, other: &Self) -> bool {
        (self.center && other.center)
            || (self.zoom && other.zoom)
            || (self.rotation && other.rotation)
    }
}

/// 正在执行的 step 及其插值起点
struct ActiveStep {
    step: AnimationStep,
    from_center: Coordinate,
    from_zoom: f64,
    from_rotation: f64,
    elapsed: Duration,
}

impl ActiveStep {
    fn duration(&self) -> Duration {
        self.step.effective_duration()
    }
}

/// 一次 `submit_animation` 产生的时间轴链
struct Chain {
    active: Option<ActiveStep>,
    pending: VecDeque<AnimationStep>,
    callback: Option<StepCallback>,
    properties: PropertySet,
}

impl Chain {
    /// 尚未回报的 step 数量（打断时每个都要收到 `false`）
    fn unreported(&self) -> usize {
        usize::from(self.active.is_some()) + self.pending.len()
    }
}

/// 延迟回调
struct Timer {
    remaining: Duration,
    callback: Box<dyn FnOnce()>,
}

/// 相机与时间轴状态
struct SimInner {
    center: Coordinate,
    zoom: f64,
    rotation: f64,
    chains: Vec<Chain>,
    timers: Vec<Timer>,
}

/// 模拟视图
///
/// 宿主在主循环里反复调用 [`tick`](Self::tick) 推进时间；
/// 核心通过 [`ViewDriver`] 接口提交动画、查询状态。
pub struct SimulatedView {
    inner: RefCell<SimInner>,
}

impl SimulatedView {
    /// 创建模拟视图
    pub fn new(center: Coordinate, zoom: f64) -> Rc<Self> {
        Rc::new(Self {
            inner: RefCell::new(SimInner {
                center,
                zoom,
                rotation: 0.0,
                chains: Vec::new(),
                timers: Vec::new(),
            }),
        })
    }

    /// 是否没有任何在途动画或挂起定时器
    pub fn is_idle(&self) -> bool {
        let inner = self.inner.borrow();
        inner.chains.is_empty() && inner.timers.is_empty()
    }

    /// 模拟用户手势：打断所有在途动画
    ///
    /// 对应真实地图引擎里用户拖拽/缩放触发的 cancelAnimations，
    /// 每条链上所有未回报的 step 都收到 `false`。
    pub fn interrupt_all(&self) {
        let chains = std::mem::take(&mut self.inner.borrow_mut().chains);
        for chain in chains {
            if let Some(callback) = &chain.callback {
                for _ in 0..chain.unreported() {
                    callback(false);
                }
            }
        }
    }

    /// 推进模拟时间
    ///
    /// 更新所有时间轴、应用插值、派发到期的 step 回调与定时器。
    pub fn tick(&self, dt: Duration) {
        let mut completed: Vec<StepCallback> = Vec::new();
        let mut due_timers: Vec<Box<dyn FnOnce()>> = Vec::new();

        {
            let mut inner = self.inner.borrow_mut();

            // 定时器
            let timers = std::mem::take(&mut inner.timers);
            for mut timer in timers {
                if timer.remaining <= dt {
                    due_timers.push(timer.callback);
                } else {
                    timer.remaining -= dt;
                    inner.timers.push(timer);
                }
            }

            // 时间轴
            let mut chains = std::mem::take(&mut inner.chains);
            for chain in &mut chains {
                Self::advance_chain(&mut inner, chain, dt, &mut completed);
            }
            chains.retain(|chain| chain.unreported() > 0);
            inner.chains = chains;
        }

        // 回调可能重入 submit_animation，必须在释放借用之后派发
        for callback in completed {
            callback(true);
        }
        for timer in due_timers {
            timer();
        }
    }

    /// 推进一条链，把走完的 step 的回调收集到 `completed`
    fn advance_chain(
        inner: &mut SimInner,
        chain: &mut Chain,
        dt: Duration,
        completed: &mut Vec<StepCallback>,
    ) {
        let mut budget = dt;

        loop {
            let Some(active) = chain.active.as_mut() else {
                return;
            };

            active.elapsed += budget;
            let duration = active.duration();

            let t = if duration.is_zero() {
                1.0
            } else {
                (active.elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
            };

            if t < 1.0 {
                let easing = active.step.easing.unwrap_or(EasingFunction::EaseInOut);
                Self::apply(inner, active, easing.apply(t));
                return;
            }

            // 走完时直接落在精确目标值上，不经过插值
            Self::apply_final(inner, active);

            // step 自然走完：回报 true，带着剩余时间预算进入下一个 step
            trace!(?active.step, "step 走完");
            if let Some(callback) = &chain.callback {
                completed.push(Rc::clone(callback));
            }
            budget = active.elapsed.saturating_sub(duration);
            chain.active = chain
                .pending
                .pop_front()
                .map(|step| Self::start_step(inner, step));

            if budget.is_zero() {
                return;
            }
        }
    }

    /// 以当前相机状态为插值起点启动一个 step
    fn start_step(inner: &SimInner, step: AnimationStep) -> ActiveStep {
        ActiveStep {
            step,
            from_center: inner.center,
            from_zoom: inner.zoom,
            from_rotation: inner.rotation,
            elapsed: Duration::ZERO,
        }
    }

    /// 把缓动后的进度应用到相机状态
    fn apply(inner: &mut SimInner, active: &ActiveStep, eased: f64) {
        if let Some(zoom) = active.step.zoom {
            inner.zoom = active.from_zoom + (zoom - active.from_zoom) * eased;
        }
        if let Some(rotation) = active.step.rotation {
            inner.rotation = active.from_rotation + (rotation - active.from_rotation) * eased;
        }

        if let Some(center) = active.step.center {
            inner.center = active.from_center.lerp(center, eased);
        } else if let Some(anchor) = active.step.anchor
            && active.step.rotation.is_some()
        {
            // 锚点固定，中心点随旋转增量绕锚点公转
            let delta = inner.rotation - active.from_rotation;
            inner.center = rotate_about(active.from_center, anchor, delta);
        }
    }

    /// 把 step 的目标值精确写入相机状态（自然走完时调用）
    fn apply_final(inner: &mut SimInner, active: &ActiveStep) {
        if let Some(zoom) = active.step.zoom {
            inner.zoom = zoom;
        }
        if let Some(rotation) = active.step.rotation {
            inner.rotation = rotation;
        }

        if let Some(center) = active.step.center {
            inner.center = center;
        } else if let Some(anchor) = active.step.anchor
            && active.step.rotation.is_some()
        {
            let delta = inner.rotation - active.from_rotation;
            inner.center = rotate_about(active.from_center, anchor, delta);
        }
    }
}

/// 点绕锚点旋转 `angle` 弧度
fn rotate_about(point: Coordinate, anchor: Coordinate, angle: f64) -> Coordinate {
    let dx = point.x - anchor.x;
    let dy = point.y - anchor.y;
    let (sin, cos) = angle.sin_cos();
    Coordinate::new(
        anchor.x + dx * cos - dy * sin,
        anchor.y + dx * sin + dy * cos,
    )
}

impl ViewDriver for SimulatedView {
    fn center(&self) -> Coordinate {
        self.inner.borrow().center
    }

    fn zoom(&self) -> f64 {
        self.inner.borrow().zoom
    }

    fn rotation(&self) -> f64 {
        self.inner.borrow().rotation
    }

    fn submit_animation(&self, steps: &[AnimationStep], callback: Option<StepCallback>) {
        let properties = PropertySet::of_steps(steps);
        let mut interrupted: Vec<(StepCallback, usize)> = Vec::new();

        {
            let mut inner = self.inner.borrow_mut();

            // 属性级抢占：触及相同属性的旧链被打断
            let mut kept = Vec::with_capacity(inner.chains.len() + 1);
            for chain in inner.chains.drain(..) {
                if chain.properties.overlaps(&properties) {
                    if let Some(cb) = &chain.callback {
                        interrupted.push((Rc::clone(cb), chain.unreported()));
                    }
                } else {
                    kept.push(chain);
                }
            }
            inner.chains = kept;

            let mut pending: VecDeque<AnimationStep> = steps.iter().copied().collect();
            let active = pending.pop_front().map(|step| Self::start_step(&inner, step));
            if active.is_some() {
                debug!(
                    steps = steps.len(),
                    preempted = interrupted.len(),
                    "提交动画批次"
                );
                inner.chains.push(Chain {
                    active,
                    pending,
                    callback,
                    properties,
                });
            }
        }

        // 被打断链的每个未回报 step 都收到 false
        for (callback, count) in interrupted {
            for _ in 0..count {
                callback(false);
            }
        }
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        self.inner.borrow_mut().timers.push(Timer {
            remaining: delay,
            callback,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    const TICK: Duration = Duration::from_millis(50);

    fn drive_until_idle(view: &Rc<SimulatedView>) {
        // 模拟时间上限，防止测试死循环
        for _ in 0..10_000 {
            if view.is_idle() {
                return;
            }
            view.tick(TICK);
        }
        panic!("simulated view never became idle");
    }

    fn recording_callback() -> (Rc<RefCell<Vec<bool>>>, StepCallback) {
        let record = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&record);
        let callback: StepCallback = Rc::new(move |completed| {
            sink.borrow_mut().push(completed);
        });
        (record, callback)
    }

    #[test]
    fn test_pan_reaches_target() {
        let view = SimulatedView::new(Coordinate::new(0.0, 0.0), 6.0);
        let target = Coordinate::new(10.0, -4.0);
        let (record, callback) = recording_callback();

        view.submit_animation(
            &[AnimationStep::new()
                .with_center(target)
                .with_duration(Duration::from_millis(500))],
            Some(callback),
        );

        drive_until_idle(&view);

        assert_eq!(view.center(), target);
        assert_eq!(*record.borrow(), vec![true]);
    }

    #[test]
    fn test_default_duration_applies() {
        let view = SimulatedView::new(Coordinate::default(), 6.0);
        view.submit_animation(&[AnimationStep::new().with_rotation(1.0)], None);

        // 默认时长 1s：500ms 后仍在途
        for _ in 0..10 {
            view.tick(TICK);
        }
        assert!(!view.is_idle());
        assert!(view.rotation() > 0.0 && view.rotation() < 1.0);

        drive_until_idle(&view);
        assert_eq!(view.rotation(), 1.0);
    }

    #[test]
    fn test_chain_runs_steps_back_to_back() {
        let view = SimulatedView::new(Coordinate::default(), 6.0);
        let (record, callback) = recording_callback();

        // 两段式缩放：先缩小一级再放回
        view.submit_animation(
            &[
                AnimationStep::new()
                    .with_zoom(5.0)
                    .with_duration(Duration::from_millis(300)),
                AnimationStep::new()
                    .with_zoom(6.0)
                    .with_duration(Duration::from_millis(300)),
            ],
            Some(callback),
        );

        // 第一段走到一半，缩放应该低于起点
        view.tick(Duration::from_millis(150));
        assert!(view.zoom() < 6.0);

        drive_until_idle(&view);
        assert_eq!(view.zoom(), 6.0);
        assert_eq!(*record.borrow(), vec![true, true]);
    }

    #[test]
    fn test_same_property_preemption() {
        let view = SimulatedView::new(Coordinate::new(0.0, 0.0), 6.0);
        let (first, first_cb) = recording_callback();
        let (second, second_cb) = recording_callback();

        view.submit_animation(
            &[AnimationStep::new()
                .with_center(Coordinate::new(10.0, 0.0))
                .with_duration(Duration::from_millis(500))],
            Some(first_cb),
        );
        view.tick(Duration::from_millis(100));

        // 新的中心点动画抢占旧的
        view.submit_animation(
            &[AnimationStep::new()
                .with_center(Coordinate::new(-5.0, 5.0))
                .with_duration(Duration::from_millis(200))],
            Some(second_cb),
        );

        assert_eq!(*first.borrow(), vec![false]);

        drive_until_idle(&view);
        assert_eq!(view.center(), Coordinate::new(-5.0, 5.0));
        assert_eq!(*second.borrow(), vec![true]);
    }

    #[test]
    fn test_disjoint_properties_run_concurrently() {
        let view = SimulatedView::new(Coordinate::new(0.0, 0.0), 6.0);
        let (pan, pan_cb) = recording_callback();
        let (zoom, zoom_cb) = recording_callback();

        view.submit_animation(
            &[AnimationStep::new()
                .with_center(Coordinate::new(10.0, 0.0))
                .with_duration(Duration::from_millis(400))],
            Some(pan_cb),
        );
        // 缩放动画不触及中心点，不应打断平移
        view.submit_animation(
            &[AnimationStep::new()
                .with_zoom(5.0)
                .with_duration(Duration::from_millis(200))],
            Some(zoom_cb),
        );

        drive_until_idle(&view);

        assert_eq!(*pan.borrow(), vec![true]);
        assert_eq!(*zoom.borrow(), vec![true]);
        assert_eq!(view.center(), Coordinate::new(10.0, 0.0));
        assert_eq!(view.zoom(), 5.0);
    }

    #[test]
    fn test_interrupted_chain_reports_every_step() {
        let view = SimulatedView::new(Coordinate::default(), 6.0);
        let (record, callback) = recording_callback();

        view.submit_animation(
            &[
                AnimationStep::new()
                    .with_zoom(5.0)
                    .with_duration(Duration::from_millis(300)),
                AnimationStep::new()
                    .with_zoom(6.0)
                    .with_duration(Duration::from_millis(300)),
            ],
            Some(callback),
        );
        view.tick(Duration::from_millis(100));

        // 第一段还在途，链上两个 step 都要收到 false
        view.submit_animation(&[AnimationStep::new().with_zoom(8.0)], None);

        assert_eq!(*record.borrow(), vec![false, false]);
    }

    #[test]
    fn test_anchor_rotation_orbits_center() {
        let view = SimulatedView::new(Coordinate::new(1.0, 0.0), 6.0);
        let anchor = Coordinate::new(0.0, 0.0);

        view.submit_animation(
            &[AnimationStep::new()
                .with_rotation(std::f64::consts::PI)
                .with_anchor(anchor)
                .with_duration(Duration::from_millis(200))],
            None,
        );
        drive_until_idle(&view);

        // 旋转 π 后中心点应该转到锚点对侧
        let center = view.center();
        assert!((center.x - (-1.0)).abs() < 1e-9);
        assert!(center.y.abs() < 1e-9);
        assert_eq!(view.rotation(), std::f64::consts::PI);
    }

    #[test]
    fn test_interrupt_all_reports_false() {
        let view = SimulatedView::new(Coordinate::default(), 6.0);
        let (pan, pan_cb) = recording_callback();
        let (zoom, zoom_cb) = recording_callback();

        view.submit_animation(
            &[AnimationStep::new().with_center(Coordinate::new(1.0, 1.0))],
            Some(pan_cb),
        );
        view.submit_animation(
            &[
                AnimationStep::new().with_zoom(5.0),
                AnimationStep::new().with_zoom(6.0),
            ],
            Some(zoom_cb),
        );
        view.tick(Duration::from_millis(100));

        view.interrupt_all();

        assert_eq!(*pan.borrow(), vec![false]);
        assert_eq!(*zoom.borrow(), vec![false, false]);
        assert!(view.is_idle());
    }

    #[test]
    fn test_schedule_fires_after_delay() {
        let view = SimulatedView::new(Coordinate::default(), 6.0);
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);

        view.schedule(
            Duration::from_millis(120),
            Box::new(move || *flag.borrow_mut() = true),
        );

        view.tick(Duration::from_millis(100));
        assert!(!*fired.borrow());
        view.tick(Duration::from_millis(50));
        assert!(*fired.borrow());
        assert!(view.is_idle());
    }
}
