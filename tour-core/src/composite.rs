//! # Composite 模块
//!
//! 组合动画：把一组并发的视图过渡归约为单一的完成裁决。
//!
//! ## 归约规则
//!
//! - 每收到一个 step 回调就递减 `remaining`，与 `completed` 取值无关。
//! - 任何一个 step 报告 `false`（被打断）时立刻结算为取消，
//!   不等待剩余 step 的回调。
//! - 全部 step 都报告 `true` 时结算为完成。
//! - 结算后到达的回调被静默吸收，结算回调绝不触发第二次。

use std::cell::RefCell;
use std::rc::Rc;

use crate::driver::{SettleCallback, StepCallback, ViewDriver};
use crate::step::AnimationStep;

/// 组合动画的归约状态
///
/// 由发起该组合的 [`CompositeAnimation`] 独占创建，只被其
/// step 回调修改。`settled` 置位后状态即冻结。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    /// 尚未回报的 step 数量
    remaining: usize,
    /// 是否所有已回报的 step 都自然走完
    all_completed: bool,
    /// 裁决是否已经产生
    settled: bool,
}

impl CompletionState {
    /// 创建新的归约状态，`expected` 为将要回报的 step 总数
    pub fn new(expected: usize) -> Self {
        Self {
            remaining: expected,
            all_completed: true,
            settled: false,
        }
    }

    /// 吸收一个 step 回调
    ///
    /// # 返回
    /// - `Some(verdict)`: 本次回调使裁决产生，`verdict` 即组合结果
    /// - `None`: 尚未结算，或已结算（迟到回调被吸收）
    pub fn absorb(&mut self, completed: bool) -> Option<bool> {
        if self.settled {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if !completed {
            // 打断信号立刻短路，不等待剩余回调
            self.all_completed = false;
            self.settled = true;
            return Some(false);
        }

        if self.remaining == 0 {
            self.settled = true;
            return Some(true);
        }

        None
    }

    /// 裁决是否已经产生
    pub fn is_settled(&self) -> bool {
        self.settled
    }
}

/// 组合动画
///
/// 一个逻辑过渡由一到多个批次组成：批次之间并发执行（例如
/// fly-to 的平移批次与缩放批次），批内 step 顺序执行（例如
/// 两段式缩放）。组合对外只产生一次结算回调。
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeAnimation {
    batches: Vec<Vec<AnimationStep>>,
}

impl CompositeAnimation {
    /// 由多个并发批次创建组合动画
    pub fn new(batches: Vec<Vec<AnimationStep>>) -> Self {
        Self { batches }
    }

    /// 由单一批次创建组合动画
    pub fn single(steps: Vec<AnimationStep>) -> Self {
        Self {
            batches: vec![steps],
        }
    }

    /// 预期回报的 step 回调总数（构造后固定）
    pub fn expected_callbacks(&self) -> usize {
        self.batches.iter().map(|batch| batch.len()).sum()
    }

    /// 发起组合动画
    ///
    /// 把所有批次提交给 Driver，并保证 `on_settled` 恰好触发一次：
    /// - 所有 step 都自然走完 → `on_settled(true)`
    /// - 任一 step 被打断 → 立刻 `on_settled(false)`，迟到回调被吸收
    /// - 组合为空 → 立刻 `on_settled(true)`（无事可做视为成功）
    pub fn issue(self, driver: &Rc<dyn ViewDriver>, on_settled: SettleCallback) {
        let expected = self.expected_callbacks();
        if expected == 0 {
            on_settled(true);
            return;
        }

        let state = Rc::new(RefCell::new(CompletionState::new(expected)));
        let on_settled = Rc::new(RefCell::new(Some(on_settled)));

        for batch in &self.batches {
            if batch.is_empty() {
                continue;
            }

            let state = Rc::clone(&state);
            let on_settled = Rc::clone(&on_settled);
            let callback: StepCallback = Rc::new(move |completed| {
                let verdict = state.borrow_mut().absorb(completed);
                if let Some(verdict) = verdict {
                    // 先释放借用再调用，结算回调可能重入 Driver
                    let done = on_settled.borrow_mut().take();
                    if let Some(done) = done {
                        done(verdict);
                    }
                }
            });

            driver.submit_animation(batch, Some(callback));
        }
    }
}
