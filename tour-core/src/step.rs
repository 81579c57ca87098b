//! # Step 模块
//!
//! 单次视图过渡的声明式描述。
//!
//! [`AnimationStep`] 只描述"到哪里、用多久、什么曲线"，
//! 不包含任何时间轴状态；时间轴由 View Driver 负责推进。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;

/// 视图空间中的一个点
///
/// 坐标投影是地图引擎的职责，核心只把坐标当作不透明的平面点。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// 创建新的坐标
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 与另一点的中点
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: self.x + (other.x - self.x) / 2.0,
            y: self.y + (other.y - self.y) / 2.0,
        }
    }

    /// 线性插值
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// 未显式指定时长时 View Driver 采用的默认时长
pub const DEFAULT_STEP_DURATION: Duration = Duration::from_millis(1000);

/// 单次视图过渡
///
/// 未设置的字段表示"保持不变"。提交后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationStep {
    /// 目标中心点
    pub center: Option<Coordinate>,
    /// 目标缩放级别
    pub zoom: Option<f64>,
    /// 目标旋转角（弧度）
    pub rotation: Option<f64>,
    /// 旋转锚点（设置后旋转绕锚点进行，中心点随之移动）
    pub anchor: Option<Coordinate>,
    /// 过渡时长，`None` 表示采用 [`DEFAULT_STEP_DURATION`]
    pub duration: Option<Duration>,
    /// 缓动函数，`None` 表示采用 Driver 默认曲线
    pub easing: Option<EasingFunction>,
}

impl AnimationStep {
    /// 创建空过渡（所有字段保持不变）
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置目标中心点
    pub fn with_center(mut self, center: Coordinate) -> Self {
        self.center = Some(center);
        self
    }

    /// 设置目标缩放级别
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// 设置目标旋转角（弧度）
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// 设置旋转锚点
    pub fn with_anchor(mut self, anchor: Coordinate) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// 设置过渡时长
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// 设置缓动函数
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    /// 生效的过渡时长
    pub fn effective_duration(&self) -> Duration {
        self.duration.unwrap_or(DEFAULT_STEP_DURATION)
    }

    /// 是否没有任何过渡目标
    pub fn is_empty(&self) -> bool {
        self.center.is_none() && self.zoom.is_none() && self.rotation.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(4.0, -2.0);
        assert_eq!(a.midpoint(b), Coordinate::new(2.0, -1.0));
    }

    #[test]
    fn test_lerp() {
        let a = Coordinate::new(0.0, 10.0);
        let b = Coordinate::new(10.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Coordinate::new(5.0, 5.0));
    }

    #[test]
    fn test_step_builder() {
        let step = AnimationStep::new()
            .with_center(Coordinate::new(1.0, 2.0))
            .with_duration(Duration::from_millis(2000))
            .with_easing(EasingFunction::EaseOutBounce);

        assert_eq!(step.center, Some(Coordinate::new(1.0, 2.0)));
        assert_eq!(step.zoom, None);
        assert_eq!(step.effective_duration(), Duration::from_millis(2000));
        assert!(!step.is_empty());
    }

    #[test]
    fn test_default_duration() {
        let step = AnimationStep::new().with_rotation(1.0);
        assert_eq!(step.effective_duration(), DEFAULT_STEP_DURATION);
    }

    #[test]
    fn test_empty_step() {
        let step = AnimationStep::new().with_duration(Duration::from_secs(1));
        assert!(step.is_empty());
    }
}
