//! Scale connection lifecycle.
//!
//! [`ScaleSession`] owns the adapter and drives scanning, connection, and the
//! notification subscription. Scanning and monitoring run as spawned tasks;
//! the latest decoded reading is published through a watch channel so hosts
//! can poll or subscribe without touching the Bluetooth stack.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bluest::{Adapter, AdvertisingDevice, Characteristic, Device, Uuid};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::decode;
use crate::permissions::{AlwaysGranted, PermissionGate, PermissionSet};
use crate::uuids;

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Bluetooth permission denied")]
    PermissionDenied,

    #[error("Bluetooth adapter is not powered on")]
    AdapterOff,

    #[error("No Bluetooth adapter available")]
    AdapterUnavailable,

    #[error("A scale is already connected; disconnect first")]
    AlreadyConnected,

    #[error("No scale is connected")]
    NotConnected,

    #[error("No discovered scale with id {0}")]
    NoSuchDevice(String),

    #[error("Connected device does not expose the scale service")]
    ServiceNotFound,

    #[error("Scale service does not expose the weight characteristic")]
    CharacteristicNotFound,

    #[error("Transport error: {0}")]
    Transport(#[from] bluest::Error),
}

/// A scale found during a scan.
#[derive(Debug, Clone)]
pub struct DiscoveredScale {
    /// Platform device identifier, unique per peripheral.
    pub id: String,
    /// Advertised device name.
    pub name: String,
    device: Device,
}

/// A spawned task with its shutdown signal.
struct TaskHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TaskHandle {
    /// Signal shutdown and wait for the task to finish.
    async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    fn abort(&self) {
        self.task.abort();
    }
}

struct Connection {
    device: Device,
    monitor: TaskHandle,
}

/// Manages the connection to a DigiScale peripheral.
///
/// One session per adapter; one connection at a time.
pub struct ScaleSession {
    adapter: Adapter,
    permissions: Box<dyn PermissionGate>,
    discovered: Arc<Mutex<Vec<DiscoveredScale>>>,
    reading_tx: watch::Sender<Option<f32>>,
    reading_rx: watch::Receiver<Option<f32>>,
    scan: Option<TaskHandle>,
    connection: Option<Connection>,
}

impl ScaleSession {
    /// How long to wait for the adapter to come up before calling it off.
    const ADAPTER_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

    /// Create a session on the default adapter, granting permissions
    /// implicitly (desktop hosts).
    pub async fn new() -> Result<Self, SessionError> {
        Self::with_permissions(Box::new(AlwaysGranted)).await
    }

    /// Create a session with a host-provided permission gate.
    pub async fn with_permissions(
        permissions: Box<dyn PermissionGate>,
    ) -> Result<Self, SessionError> {
        let adapter = Adapter::default()
            .await
            .ok_or(SessionError::AdapterUnavailable)?;
        let (reading_tx, reading_rx) = watch::channel(None);
        Ok(Self {
            adapter,
            permissions,
            discovered: Arc::new(Mutex::new(Vec::new())),
            reading_tx,
            reading_rx,
            scan: None,
            connection: None,
        })
    }

    /// Ask for permissions and start scanning for scales.
    ///
    /// A scan already in progress is stopped first, with a short pause before
    /// the restart. The discovered list resets for each scan.
    pub async fn start_scan(&mut self) -> Result<(), SessionError> {
        if !self.permissions.request(PermissionSet::required()) {
            return Err(SessionError::PermissionDenied);
        }

        match timeout(Self::ADAPTER_PROBE_TIMEOUT, self.adapter.wait_available()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => return Err(SessionError::Transport(err)),
            Err(_) => return Err(SessionError::AdapterOff),
        }

        if self.stop_scan().await {
            tokio::time::sleep(uuids::SCAN_RESTART_QUIESCENCE).await;
        }
        lock_list(&self.discovered).clear();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = oneshot::channel();
        let task = tokio::spawn(run_scan(
            self.adapter.clone(),
            Arc::clone(&self.discovered),
            shutdown_rx,
            ready_tx,
        ));
        let handle = TaskHandle {
            shutdown: shutdown_tx,
            task,
        };

        match ready_rx.await {
            Ok(Ok(())) => {
                self.scan = Some(handle);
                Ok(())
            }
            Ok(Err(err)) => Err(err),
            Err(_) => {
                log::error!("scan task exited before starting");
                Err(SessionError::AdapterUnavailable)
            }
        }
    }

    /// Stop any scan in progress. Returns whether one was running.
    pub async fn stop_scan(&mut self) -> bool {
        match self.scan.take() {
            Some(scan) => {
                scan.stop().await;
                true
            }
            None => false,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scan
            .as_ref()
            .is_some_and(|scan| !scan.task.is_finished())
    }

    /// Snapshot of the scales discovered so far, in discovery order.
    pub fn discovered_scales(&self) -> Vec<DiscoveredScale> {
        lock_list(&self.discovered).clone()
    }

    /// Connect to a discovered scale and start streaming readings.
    ///
    /// Only one connection at a time; disconnect before connecting again.
    pub async fn connect(&mut self, device_id: &str) -> Result<(), SessionError> {
        if self.connection.is_some() {
            return Err(SessionError::AlreadyConnected);
        }

        let device = lock_list(&self.discovered)
            .iter()
            .find(|scale| scale.id == device_id)
            .map(|scale| scale.device.clone())
            .ok_or_else(|| SessionError::NoSuchDevice(device_id.to_string()))?;

        self.stop_scan().await;
        self.adapter.connect_device(&device).await?;

        let monitor = match self.subscribe(&device).await {
            Ok(monitor) => monitor,
            Err(err) => {
                if let Err(disconnect_err) = self.adapter.disconnect_device(&device).await {
                    log::warn!("disconnect after failed subscribe: {}", disconnect_err);
                }
                return Err(err);
            }
        };

        self.connection = Some(Connection { device, monitor });
        Ok(())
    }

    /// Discover the weight characteristic and spawn the monitor task.
    async fn subscribe(&self, device: &Device) -> Result<TaskHandle, SessionError> {
        let service = device
            .discover_services_with_uuid(uuids::scale_service())
            .await?
            .first()
            .ok_or(SessionError::ServiceNotFound)?
            .clone();
        let characteristic = service
            .discover_characteristics_with_uuid(uuids::weight_characteristic())
            .await?
            .first()
            .ok_or(SessionError::CharacteristicNotFound)?
            .clone();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = oneshot::channel();
        let task = tokio::spawn(run_monitor(
            characteristic,
            self.reading_tx.clone(),
            shutdown_rx,
            ready_tx,
        ));
        let handle = TaskHandle {
            shutdown: shutdown_tx,
            task,
        };

        match ready_rx.await {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(err)) => Err(err),
            Err(_) => {
                log::error!("monitor task exited before subscribing");
                Err(SessionError::NotConnected)
            }
        }
    }

    /// Tear down the subscription, drop the connection, clear the reading.
    pub async fn disconnect(&mut self) -> Result<(), SessionError> {
        let connection = self.connection.take().ok_or(SessionError::NotConnected)?;
        connection.monitor.stop().await;
        self.adapter.disconnect_device(&connection.device).await?;
        let _ = self.reading_tx.send(None);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Identifier of the connected scale, if any.
    pub fn connected_scale_id(&self) -> Option<String> {
        self.connection
            .as_ref()
            .map(|connection| device_key(&connection.device))
    }

    /// Latest decoded reading, if the scale has reported one.
    pub fn current_reading(&self) -> Option<f32> {
        *self.reading_rx.borrow()
    }

    /// Subscribe to reading updates.
    pub fn readings(&self) -> watch::Receiver<Option<f32>> {
        self.reading_rx.clone()
    }

    /// Stop scanning, remove any subscription, then drop the connection.
    /// Safe from any state.
    pub async fn shutdown(&mut self) {
        self.stop_scan().await;
        if let Some(connection) = self.connection.take() {
            connection.monitor.stop().await;
            if let Err(err) = self.adapter.disconnect_device(&connection.device).await {
                log::warn!("disconnect during shutdown: {}", err);
            }
        }
        let _ = self.reading_tx.send(None);
    }
}

impl Drop for ScaleSession {
    fn drop(&mut self) {
        if let Some(scan) = &self.scan {
            scan.abort();
        }
        if let Some(connection) = &self.connection {
            connection.monitor.abort();
        }
    }
}

fn lock_list(list: &Mutex<Vec<DiscoveredScale>>) -> MutexGuard<'_, Vec<DiscoveredScale>> {
    list.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn device_key(device: &Device) -> String {
    format!("{:?}", device.id())
}

/// Scan task: filter advertisements by name token and accumulate unique
/// devices in discovery order.
async fn run_scan(
    adapter: Adapter,
    discovered: Arc<Mutex<Vec<DiscoveredScale>>>,
    mut shutdown: watch::Receiver<bool>,
    ready: oneshot::Sender<Result<(), SessionError>>,
) {
    // Scales are matched by advertised name, not service filter.
    let services: [Uuid; 0] = [];
    let mut events = match adapter.scan(&services).await {
        Ok(events) => {
            let _ = ready.send(Ok(()));
            events
        }
        Err(err) => {
            let _ = ready.send(Err(SessionError::Transport(err)));
            return;
        }
    };

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            event = events.next() => {
                let Some(adv) = event else { break };
                record_discovery(&discovered, adv).await;
            }
        }
    }
}

async fn record_discovery(discovered: &Mutex<Vec<DiscoveredScale>>, adv: AdvertisingDevice) {
    let device = adv.device;
    let name = match device.name_async().await {
        Ok(name) => name,
        // Unnamed advertisements cannot be ours
        Err(_) => return,
    };
    if !name.contains(uuids::DEVICE_NAME_TOKEN) {
        return;
    }

    let id = device_key(&device);
    let mut list = lock_list(discovered);
    if list.iter().any(|scale| scale.id == id) {
        return;
    }
    log::debug!("discovered scale: {} ({})", name, id);
    list.push(DiscoveredScale { id, name, device });
}

/// Monitor task: decode every notification into the current reading.
///
/// The shutdown signal makes this task drop its stream, which removes the
/// subscription, so teardown never surfaces a cancellation to the caller.
async fn run_monitor(
    characteristic: Characteristic,
    reading: watch::Sender<Option<f32>>,
    mut shutdown: watch::Receiver<bool>,
    ready: oneshot::Sender<Result<(), SessionError>>,
) {
    let mut notifications = match characteristic.notify().await {
        Ok(stream) => {
            let _ = ready.send(Ok(()));
            stream
        }
        Err(err) => {
            let _ = ready.send(Err(SessionError::Transport(err)));
            return;
        }
    };

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            notification = notifications.next() => {
                match notification {
                    Some(Ok(payload)) => publish_reading(&reading, &payload),
                    Some(Err(err)) => log::warn!("notification error: {}", err),
                    None => break,
                }
            }
        }
    }
}

fn publish_reading(reading: &watch::Sender<Option<f32>>, payload: &[u8]) {
    match decode::decode_reading(payload) {
        Ok(value) => {
            let _ = reading.send(value);
        }
        Err(err) => log::warn!("undecodable notification: {}", err),
    }
}
