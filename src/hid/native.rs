use super::{HidBackend, LinkError, ReportStream};
use crate::device::DeviceFilter;
use hidapi::{HidApi, HidDevice};

/// USB backend on top of `hidapi`.
#[derive(Default)]
pub struct HidApiBackend;

impl HidApiBackend {
    pub fn new() -> Self {
        Self
    }
}

impl HidBackend for HidApiBackend {
    fn open(&mut self, filter: &DeviceFilter) -> Result<Box<dyn ReportStream>, LinkError> {
        let api = HidApi::new()
            .map_err(|e| LinkError::Unavailable(format!("hid init failed: {e}")))?;

        // Enumeration order is platform dependent; first match wins.
        let info = api
            .device_list()
            .find(|d| filter.matches(d.vendor_id(), d.product_id()))
            .cloned()
            .ok_or(LinkError::NotFound)?;

        let device = info
            .open_device(&api)
            .map_err(|e| LinkError::Unavailable(e.to_string()))?;

        Ok(Box::new(HidApiStream {
            device: Some(device),
            _api: api,
        }))
    }
}

/// Keeps the `HidApi` context alive for as long as the device handle.
struct HidApiStream {
    device: Option<HidDevice>,
    _api: HidApi,
}

impl ReportStream for HidApiStream {
    fn write_report(&mut self, report: &[u8]) -> Result<usize, LinkError> {
        let Some(device) = self.device.as_ref() else {
            return Err(LinkError::WriteFailure("stream already closed".to_string()));
        };

        device
            .write(report)
            .map_err(|e| LinkError::WriteFailure(e.to_string()))
    }

    fn close(&mut self) -> Result<(), LinkError> {
        // hidapi closes the handle on drop
        self.device.take();
        Ok(())
    }
}
