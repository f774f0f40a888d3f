use crate::color::Color;

/// Sony vendor ID
pub const SONY_VENDOR_ID: u16 = 0x054C;

/// DualShock 4, first revision (CUH-ZCT1)
pub const DS4_V1_PRODUCT_ID: u16 = 0x05C4;

/// DualShock 4, second revision (CUH-ZCT2)
pub const DS4_V2_PRODUCT_ID: u16 = 0x09CC;

/// Size of the light bar output report.
pub const REPORT_LEN: usize = 32;

const REPORT_ID: u8 = 0x05;
const FEATURE_FLAGS: u8 = 0xFF;
const RED_OFFSET: usize = 6;
const GREEN_OFFSET: usize = 7;
const BLUE_OFFSET: usize = 8;

/// Which USB devices count as a light bar we can drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    pub vendor_id: u16,
    pub product_ids: Vec<u16>,
}

impl DeviceFilter {
    /// The DualShock 4 filter: Sony vendor, either controller revision.
    pub fn dualshock4() -> Self {
        Self {
            vendor_id: SONY_VENDOR_ID,
            product_ids: vec![DS4_V1_PRODUCT_ID, DS4_V2_PRODUCT_ID],
        }
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        vendor_id == self.vendor_id && self.product_ids.contains(&product_id)
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::dualshock4()
    }
}

/// Build the output report that sets the light bar to `color`.
///
/// Layout expected by the controller firmware:
/// byte 0 report ID, byte 1 feature flags, bytes 6..=8 red/green/blue,
/// all other bytes zero.
pub fn encode_report(color: Color) -> [u8; REPORT_LEN] {
    let [r, g, b] = color.to_rgb8();

    let mut report = [0u8; REPORT_LEN];
    report[0] = REPORT_ID;
    report[1] = FEATURE_FLAGS;
    report[RED_OFFSET] = r;
    report[GREEN_OFFSET] = g;
    report[BLUE_OFFSET] = b;
    report
}
