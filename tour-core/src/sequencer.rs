//! # Sequencer 模块
//!
//! 把一串组合动画按顺序串成巡游：上一站干净完成才前进到下一站，
//! 任何一站被打断则整条巡游立刻终止。
//!
//! ## 状态机
//!
//! `Idle → Running(0) → Running(1) → … → Succeeded`
//!
//! 任意 `Running(i)` 收到打断信号都直接进入 `Cancelled`。
//! 两个终态都是最终状态：之后不再发起任何组合动画，
//! 迟到的回调被静默忽略。

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::composite::CompositeAnimation;
use crate::driver::{FinishCallback, ViewDriver};
use crate::step::Coordinate;

/// 为一站巡游生成组合动画的规划函数
///
/// 在发起时刻调用，因此可以读取 Driver 的当前状态
/// （例如以当前缩放级别为基准规划两段式缩放）。
pub type LegPlanner = Rc<dyn Fn(&Rc<dyn ViewDriver>, Coordinate) -> CompositeAnimation>;

/// 巡游状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    /// 尚未出发
    Idle,
    /// 正在飞往第 i 站
    Running(usize),
    /// 全程干净完成（终态）
    Succeeded,
    /// 某一站被打断（终态）
    Cancelled,
}

impl TourPhase {
    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Cancelled)
    }
}

/// 单次巡游的内部状态
///
/// 每次 `run` 创建一份，游标只会单调前进，到达终态即冻结。
struct Sequence {
    locations: Vec<Coordinate>,
    phase: RefCell<TourPhase>,
    on_finished: RefCell<Option<FinishCallback>>,
}

impl Sequence {
    /// 触发整体结束回调（结构上只可能成功一次）
    fn finish(&self, succeeded: bool) {
        // 先释放借用再调用，回调可能重入
        let done = self.on_finished.borrow_mut().take();
        if let Some(done) = done {
            done(succeeded);
        }
    }
}

/// 状态推进决策
enum Advance {
    /// 终态后的迟到信号，忽略
    Ignore,
    /// 到达终态，报告结果
    Finish(bool),
    /// 发起第 i 站
    Issue(usize),
}

/// 巡游排程器
///
/// 持有注入的 Driver 句柄与航线规划函数；每次 [`run`](Self::run)
/// 驱动一条独立的巡游序列。
pub struct TourSequencer {
    driver: Rc<dyn ViewDriver>,
    plan_leg: LegPlanner,
    step_delay: Duration,
}

impl TourSequencer {
    /// 创建排程器
    ///
    /// # 参数
    /// - `driver`: View Driver 句柄
    /// - `plan_leg`: 每一站的组合动画规划函数
    /// - `step_delay`: 站与站之间的停顿（首站不停顿，立刻出发）
    pub fn new(driver: Rc<dyn ViewDriver>, plan_leg: LegPlanner, step_delay: Duration) -> Self {
        Self {
            driver,
            plan_leg,
            step_delay,
        }
    }

    /// 启动巡游
    ///
    /// 立即返回；`on_finished` 在到达终态时恰好触发一次：
    /// 全程完成为 `true`，中途被打断为 `false`。
    /// 空站点列表视为立刻成功。
    pub fn run(&self, locations: Vec<Coordinate>, on_finished: FinishCallback) {
        let sequence = Rc::new(Sequence {
            locations,
            phase: RefCell::new(TourPhase::Idle),
            on_finished: RefCell::new(Some(on_finished)),
        });

        Self::advance(
            Rc::clone(&self.driver),
            Rc::clone(&self.plan_leg),
            self.step_delay,
            sequence,
            true,
        );
    }

    /// 处理一站的结算结果并推进状态机
    fn advance(
        driver: Rc<dyn ViewDriver>,
        plan_leg: LegPlanner,
        step_delay: Duration,
        sequence: Rc<Sequence>,
        completed: bool,
    ) {
        let decision = {
            let mut phase = sequence.phase.borrow_mut();
            if phase.is_terminal() {
                Advance::Ignore
            } else if !completed {
                *phase = TourPhase::Cancelled;
                Advance::Finish(false)
            } else {
                let next = match *phase {
                    TourPhase::Idle => 0,
                    TourPhase::Running(i) => i + 1,
                    TourPhase::Succeeded | TourPhase::Cancelled => unreachable!(),
                };
                if next < sequence.locations.len() {
                    *phase = TourPhase::Running(next);
                    Advance::Issue(next)
                } else {
                    *phase = TourPhase::Succeeded;
                    Advance::Finish(true)
                }
            }
        };

        match decision {
            Advance::Ignore => {}
            Advance::Finish(succeeded) => sequence.finish(succeeded),
            Advance::Issue(index) => {
                let location = sequence.locations[index];
                let issue_driver = Rc::clone(&driver);
                let issue = move || {
                    let composite = (plan_leg)(&issue_driver, location);
                    let next_driver = Rc::clone(&issue_driver);
                    let next_plan = Rc::clone(&plan_leg);
                    composite.issue(
                        &issue_driver,
                        Box::new(move |settled| {
                            Self::advance(next_driver, next_plan, step_delay, sequence, settled);
                        }),
                    );
                };

                // 首站立刻出发，之后每站先停顿再出发
                if index == 0 || step_delay.is_zero() {
                    issue();
                } else {
                    driver.schedule(step_delay, Box::new(issue));
                }
            }
        }
    }
}
