//! # 相机巡游演示（无头）
//!
//! 在模拟相机上运行 `tour-core` 的巡游与单发动作，
//! 通过日志观察动画的发起、抢占与结算。

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use host_cli::{SimulatedView, TourConfig};
use tour_core::{CameraController, EasingFunction, ViewDriver};

/// 地图相机巡游演示（无头模拟）
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// 巡游配置文件（JSON），缺省使用内置五城巡游
    #[arg(long)]
    tour: Option<PathBuf>,

    /// 模拟时间步长（毫秒）
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,

    /// 在指定秒数模拟一次用户手势，打断在途动画
    #[arg(long)]
    interrupt_at: Option<f64>,

    /// 运行单发动作而不是巡游
    #[arg(long, value_enum)]
    action: Option<Action>,
}

/// 单发相机动作
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    /// 左转 90°
    RotateLeft,
    /// 右转 90°
    RotateRight,
    /// 平移到第一站
    Pan,
    /// 弹性缓动平移
    ElasticPan,
    /// 弹跳缓动平移
    BouncePan,
    /// 边转一整圈边移动
    Spin,
    /// 绕第一站旋转一整圈
    RotateAround,
    /// 飞往第一站（平移 + 两段缩放）
    Fly,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();
    let config = match &cli.tour {
        Some(path) => TourConfig::load(path)
            .with_context(|| format!("加载巡游配置 {} 失败", path.display()))?,
        None => TourConfig::default(),
    };

    let view = SimulatedView::new(config.initial.center, config.initial.zoom);
    let driver: Rc<dyn ViewDriver> = view.clone();
    let camera = CameraController::new(driver)
        .with_fly_duration(config.fly_duration())
        .with_tour_delay(config.step_delay());

    // 巡游/飞行的结算结果；单发动作不关心结算
    let outcome: Rc<Cell<Option<bool>>> = Rc::new(Cell::new(None));

    match cli.action {
        Some(action) => {
            info!(action = ?action, "执行单发动作");
            run_action(&camera, &config, action, &outcome);
        }
        None => {
            info!(stops = config.stops.len(), "开始巡游");
            let sink = Rc::clone(&outcome);
            camera.run_tour(
                config.locations(),
                Box::new(move |succeeded| sink.set(Some(succeeded))),
            );
        }
    }

    let dt = Duration::from_millis(cli.tick_ms.max(1));
    // 模拟时间上限，防止配置异常导致死循环
    let deadline = Duration::from_secs(300);
    let mut elapsed = Duration::ZERO;
    let mut interrupt_pending = cli.interrupt_at;

    while !view.is_idle() && elapsed < deadline {
        if let Some(at) = interrupt_pending
            && elapsed.as_secs_f64() >= at
        {
            interrupt_pending = None;
            warn!(at_secs = at, "模拟用户手势，打断在途动画");
            view.interrupt_all();
        }

        view.tick(dt);
        elapsed += dt;
    }

    let center = view.center();
    info!(
        x = center.x,
        y = center.y,
        zoom = view.zoom(),
        rotation = view.rotation(),
        "最终相机状态"
    );

    match outcome.get() {
        Some(true) => info!("巡游完成"),
        Some(false) => warn!("巡游被取消"),
        None => info!("动作执行完毕"),
    }

    Ok(())
}

/// 把 CLI 动作翻译成相机操作，目标取第一站
fn run_action(
    camera: &CameraController,
    config: &TourConfig,
    action: Action,
    outcome: &Rc<Cell<Option<bool>>>,
) {
    let target = config
        .stops
        .first()
        .map(|stop| stop.coord)
        .unwrap_or_default();

    match action {
        Action::RotateLeft => camera.rotate_left(),
        Action::RotateRight => camera.rotate_right(),
        Action::Pan => camera.pan_to(target),
        Action::ElasticPan => camera.eased_pan_to(target, EasingFunction::EaseOutElastic),
        Action::BouncePan => camera.eased_pan_to(target, EasingFunction::EaseOutBounce),
        Action::Spin => camera.spin_to(target),
        Action::RotateAround => camera.rotate_around(target),
        Action::Fly => {
            let sink = Rc::clone(outcome);
            camera.fly_to(
                target,
                Box::new(move |completed| sink.set(Some(completed))),
            );
        }
    }
}
