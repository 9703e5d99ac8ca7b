use std::sync::Arc;

use parking_lot::Mutex;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use h264_rtp::{H264Packetizer, PacketizeError, PacketizerConfig, Packetizer, TimeBase};

fn to_py_err(e: PacketizeError) -> PyErr {
    match e {
        PacketizeError::InvalidConfig(_) | PacketizeError::InvalidTimeBase(_) => {
            PyValueError::new_err(e.to_string())
        }
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

#[pyclass(name = "H264Packetizer")]
pub struct PyH264Packetizer {
    inner: Arc<Mutex<H264Packetizer>>,
}

#[pymethods]
impl PyH264Packetizer {
    #[new]
    #[pyo3(signature = (max_payload = 1300, clock_rate = 90000, payload_type = 96))]
    fn new(max_payload: usize, clock_rate: u32, payload_type: u8) -> PyResult<Self> {
        let config = PacketizerConfig {
            max_payload,
            clock_rate,
            payload_type,
            ..PacketizerConfig::default()
        };
        let packetizer = H264Packetizer::new(config).map_err(to_py_err)?;
        Ok(PyH264Packetizer {
            inner: Arc::new(Mutex::new(packetizer)),
        })
    }

    /// Packetize one Annex B access unit.
    ///
    /// Returns `(payloads, timestamp)` with the timestamp rescaled from
    /// `time_base_num / time_base_den` to the RTP clock.
    #[pyo3(signature = (frame_data, pts, time_base_num = 1, time_base_den = 90000))]
    fn pack(
        &self,
        frame_data: &[u8],
        pts: i64,
        time_base_num: u32,
        time_base_den: u32,
    ) -> PyResult<(Vec<Vec<u8>>, i64)> {
        let time_base = TimeBase::new(time_base_num, time_base_den).map_err(to_py_err)?;
        let au = self
            .inner
            .lock()
            .packetize(frame_data, pts, time_base)
            .map_err(to_py_err)?;
        Ok((au.payloads, au.timestamp))
    }

    /// Payloads only, no timestamp conversion.
    fn packetize(&self, frame_data: &[u8]) -> PyResult<Vec<Vec<u8>>> {
        self.inner
            .lock()
            .packetize_annex_b(frame_data)
            .map_err(to_py_err)
    }

    fn sdp_attributes(&self) -> Vec<String> {
        self.inner.lock().sdp_attributes()
    }
}
