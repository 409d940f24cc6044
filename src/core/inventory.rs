use crate::domain::model::Car;
use crate::utils::error::{InventoryError, Result};

/// The ordered, in-memory list of cars the user is working on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    cars: Vec<Car>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, car: Car) {
        self.cars.push(car);
    }

    pub fn extend(&mut self, cars: impl IntoIterator<Item = Car>) {
        self.cars.extend(cars);
    }

    /// Removes the car at a zero-based `index`, keeping the others in order.
    pub fn remove(&mut self, index: usize) -> Result<Car> {
        if index >= self.cars.len() {
            return Err(InventoryError::IndexOutOfRange {
                index: index + 1,
                len: self.cars.len(),
            });
        }
        Ok(self.cars.remove(index))
    }

    pub fn cars(&self) -> &[Car] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

impl From<Vec<Car>> for Inventory {
    fn from(cars: Vec<Car>) -> Self {
        Self { cars }
    }
}
