pub mod panel;

pub use panel::{
    calculate_panel_price, price_panel, try_price_panel, PanelPriceInput, PricingResult,
    PricingRole, TestPricingDetail,
};
