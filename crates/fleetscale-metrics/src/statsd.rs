//! StatsD UDP sink, gated by `STATSD_ENABLED`.

use std::net::UdpSocket;
use std::sync::Mutex;

use fleetscale_core::MetricsSink;
use tracing::warn;

/// Ships gauges and counters as UDP StatsD packets. `send` is
/// fire-and-forget: a dropped or unreachable StatsD agent must never
/// block or fail the control loop.
pub struct StatsdSink {
    socket: Mutex<UdpSocket>,
    addr: String,
    prefix: String,
}

impl StatsdSink {
    pub fn new(host: &str, port: u16, prefix: impl Into<String>) -> std::io::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket: Mutex::new(socket),
            addr: format!("{host}:{port}"),
            prefix: prefix.into(),
        })
    }

    fn send(&self, line: &str) {
        let socket = self.socket.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = socket.send_to(line.as_bytes(), &self.addr) {
            warn!(target = %self.addr, error = %e, "statsd send failed");
        }
    }
}

impl MetricsSink for StatsdSink {
    fn gauge(&self, name: &str, value: f64) {
        self.send(&format!("{}.{name}:{value}|g", self.prefix));
    }

    fn incr(&self, name: &str, value: f64) {
        self.send(&format!("{}.{name}:{value}|c", self.prefix));
    }
}
