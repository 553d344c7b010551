// ── Invocation session ──
//
// One session per action invocation: the shared transport, the
// cancellation token, the poll interval and the memoized device role.
// Nothing in here outlives the invocation.

use std::future::Future;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::appliance::Appliance;
use crate::error::CoreError;
use crate::role::DeviceRole;

pub struct Session<'a, A> {
    appliance: &'a A,
    cancel: CancellationToken,
    poll_interval: Duration,
    role: OnceCell<DeviceRole>,
}

impl<'a, A: Appliance> Session<'a, A> {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(appliance: &'a A, cancel: CancellationToken) -> Self {
        Self {
            appliance,
            cancel,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            role: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn appliance(&self) -> &'a A {
        self.appliance
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Probe the appliance role once; later calls return the cached value.
    pub async fn role(&self) -> Result<DeviceRole, CoreError> {
        self.role
            .get_or_try_init(|| async {
                let info = self.call(self.appliance.system_info()).await?;
                let role = DeviceRole::from_system_info(&info);
                debug!(%role, model = ?info.model, "detected device role");
                Ok(role)
            })
            .await
            .copied()
    }

    /// Run one transport call, abandoning it if the session is cancelled.
    pub async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, CoreError>>,
    ) -> Result<T, CoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            res = fut => res,
        }
    }

    /// Sleep one poll interval unless cancelled first.
    pub(crate) async fn pause(&self) -> Result<(), CoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            () = tokio::time::sleep(self.poll_interval) => Ok(()),
        }
    }
}
