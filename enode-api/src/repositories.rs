use crate::endpoints::vehicles::ListVehicles;

#[derive(Default)]
pub struct VehicleRepository {
    page_size: Option<u32>,
}

impl VehicleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn list(&self) -> ListVehicles {
        match self.page_size {
            Some(page_size) => ListVehicles::new().page_size(page_size),
            None => ListVehicles::new(),
        }
    }
}
