//! Docker page resources, selectors, and the image-pull mutation.
//!
//! # Design
//! - Containers, stats, and images are independent widgets and poll best-effort.
//! - A successful pull refreshes only the image list.

use nasdash_api_models::{Container, ContainerStats, Image, ImagePullRequest};
use serde_json::Value;
use thiserror::Error;

use crate::core::backend::{Method, SharedBackend, fetcher, paths, send};
use crate::core::format::{ChartPoint, as_f64, ratio_percent, round2};
use crate::core::poll::{FetchFuture, PollGroup, Resource};

/// Shown when any Docker endpoint fails.
pub const FAILURE_MESSAGE: &str = "获取 Docker 数据失败：Docker 服务可能未运行或未安装";
/// Shown when a pull fails without a backend detail.
pub const PULL_FAILURE_MESSAGE: &str = "拉取镜像失败，请检查镜像名称是否正确";

/// Resource key for the container list.
pub const CONTAINERS: &str = "containers";
/// Resource key for container stats.
pub const STATS: &str = "stats";
/// Resource key for the image list.
pub const IMAGES: &str = "images";

/// The engine reports CPU as cumulative nanoseconds; this divisor yields the
/// percentage the dashboard has always shown.
const CPU_DIVISOR: f64 = 10_000_000.0;

/// Handles to everything the Docker page renders.
#[derive(Clone, Debug, PartialEq)]
pub struct DockerResources {
    /// All containers, running or not.
    pub containers: Resource<Vec<Container>>,
    /// Usage of running containers.
    pub stats: Resource<Vec<ContainerStats>>,
    /// Local images.
    pub images: Resource<Vec<Image>>,
}

impl DockerResources {
    /// Bind the Docker endpoints to `backend`.
    #[must_use]
    pub fn new(backend: &SharedBackend) -> Self {
        Self {
            containers: Resource::new(CONTAINERS, fetcher(backend, paths::DOCKER_CONTAINERS)),
            stats: Resource::new(STATS, fetcher(backend, paths::DOCKER_STATS)),
            images: Resource::new(IMAGES, fetcher(backend, paths::DOCKER_IMAGES)),
        }
    }

    /// Best-effort group over all three resources.
    #[must_use]
    pub fn group(&self, failure_message: &str) -> PollGroup {
        PollGroup::builder("docker")
            .resource(&self.containers)
            .resource(&self.stats)
            .resource(&self.images)
            .failure_message(failure_message)
            .build()
    }
}

/// CPU percentage per container, two decimals.
#[must_use]
pub fn cpu_series(stats: &[ContainerStats]) -> Vec<ChartPoint> {
    stats
        .iter()
        .map(|entry| {
            ChartPoint::new(
                entry.name.clone(),
                round2(as_f64(entry.cpu_usage) / CPU_DIVISOR),
            )
        })
        .collect()
}

/// Memory usage as a percentage of the limit, two decimals.
#[must_use]
pub fn memory_series(stats: &[ContainerStats]) -> Vec<ChartPoint> {
    stats
        .iter()
        .map(|entry| {
            ChartPoint::new(
                entry.name.clone(),
                round2(ratio_percent(entry.memory_usage, entry.memory_limit)),
            )
        })
        .collect()
}

/// Running containers count and total.
#[must_use]
pub fn running_summary(containers: &[Container]) -> (usize, usize) {
    let running = containers.iter().filter(|container| container.is_running()).count();
    (running, containers.len())
}

/// Rejected image reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ImageNameError {
    /// Nothing was typed.
    #[error("image name is required")]
    Empty,
    /// References never contain whitespace.
    #[error("image name must not contain spaces")]
    Whitespace,
}

/// Image reference typed by the user, trimmed.
///
/// # Errors
///
/// Returns [`ImageNameError`] when the input is blank or contains whitespace.
pub fn validate_image_name(input: &str) -> Result<String, ImageNameError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ImageNameError::Empty);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(ImageNameError::Whitespace);
    }
    Ok(name.to_string())
}

/// Ask the engine to pull `image_name`.
pub fn pull_image(backend: &SharedBackend, image_name: String) -> FetchFuture<Value> {
    send(
        backend,
        Method::Post,
        paths::DOCKER_IMAGE_PULL,
        &ImagePullRequest { image_name },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::testing::ScriptedBackend;
    use serde_json::json;

    fn stats(name: &str, cpu: u64, usage: u64, limit: u64) -> ContainerStats {
        serde_json::from_value(json!({
            "name": name, "cpu_usage": cpu, "memory_usage": usage, "memory_limit": limit
        }))
        .expect("stats")
    }

    #[test]
    fn cpu_series_scales_engine_counters() {
        let series = cpu_series(&[stats("web", 123_456_789, 0, 1)]);
        assert_eq!(series, vec![ChartPoint::new("web", 12.35)]);
    }

    #[test]
    fn memory_series_uses_limit() {
        let series = memory_series(&[stats("db", 0, 256, 1024), stats("idle", 0, 0, 0)]);
        assert_eq!(series[0], ChartPoint::new("db", 25.0));
        assert_eq!(series[1], ChartPoint::new("idle", 0.0));
    }

    #[test]
    fn image_names_are_trimmed_and_checked() {
        assert_eq!(validate_image_name("  nginx:latest "), Ok("nginx:latest".to_string()));
        assert_eq!(validate_image_name("   "), Err(ImageNameError::Empty));
        assert_eq!(
            validate_image_name("nginx latest"),
            Err(ImageNameError::Whitespace)
        );
    }

    #[tokio::test]
    async fn pull_posts_image_name() {
        let backend = ScriptedBackend::new();
        backend.respond(Method::Post, paths::DOCKER_IMAGE_PULL, Ok(json!({"status": "ok"})));
        pull_image(&backend.shared(), "redis:7".to_string())
            .await
            .expect("pulled");
        let call = &backend.calls()[0];
        assert_eq!(call.path, paths::DOCKER_IMAGE_PULL);
        assert_eq!(call.body, Some(json!({"image_name": "redis:7"})));
    }
}
