mod packetizer;

use pyo3::prelude::*;

#[pymodule]
#[pyo3(name = "h264_rtp_py")]
fn h264_rtp_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<packetizer::PyH264Packetizer>()?;
    Ok(())
}
