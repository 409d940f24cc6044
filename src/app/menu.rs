use crate::core::inventory::Inventory;
use crate::core::persistence::Persistence;
use crate::domain::model::{parse_year, Car, DuplicatePolicy, Format};
use crate::domain::ports::Storage;
use crate::utils::error::{InventoryError, Result};
use std::io::{BufRead, Write};

const WRONG_INPUT: &str = "Wrong input. You can only type in a number or \"e\" for exit.";

/// Interactive loop over any line-based input and output.
///
/// Errors from the persistence layer are shown to the user and the loop
/// goes on; only failures of `input`/`output` themselves end it.
pub struct Menu<R, W, S: Storage + Clone + 'static> {
    input: R,
    output: W,
    persistence: Persistence<S>,
    policy: DuplicatePolicy,
    inventory: Inventory,
}

impl<R: BufRead, W: Write, S: Storage + Clone + 'static> Menu<R, W, S> {
    pub fn new(input: R, output: W, persistence: Persistence<S>, policy: DuplicatePolicy) -> Self {
        Self {
            input,
            output,
            persistence,
            policy,
            inventory: Inventory::new(),
        }
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Application to manipulate files")?;

        loop {
            writeln!(self.output, "---------------")?;
            writeln!(self.output, "Choose what to do:")?;
            writeln!(self.output, "1. Export")?;
            writeln!(self.output, "2. Import")?;
            writeln!(self.output, "3. Add a car")?;
            writeln!(self.output, "4. Show list of cars")?;
            writeln!(self.output, "5. Delete a car")?;
            writeln!(self.output, "e. Exit")?;

            let Some(choice) = self.prompt("Enter a number: ")? else {
                break;
            };

            match choice.to_lowercase().as_str() {
                "1" => self.export().await?,
                "2" => self.import().await?,
                "3" => self.add_car()?,
                "4" => self.show_cars()?,
                "5" => self.delete_car()?,
                "e" => break,
                _ => writeln!(self.output, "{}", WRONG_INPUT)?,
            }
        }

        tracing::debug!("Menu closed with {} cars in memory", self.inventory.len());
        Ok(())
    }

    /// Writes `message`, then reads one trimmed line. `None` on end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, err: &InventoryError) -> Result<()> {
        tracing::warn!("{} (category: {:?})", err, err.category());
        writeln!(self.output, "❌ {}", err.user_friendly_message())?;
        writeln!(self.output, "💡 {}", err.recovery_suggestion())?;
        Ok(())
    }

    async fn export(&mut self) -> Result<()> {
        let Some(stem) = self.prompt("Give file name without extension:\n")? else {
            return Ok(());
        };
        if stem.is_empty() {
            writeln!(self.output, "File name cannot be empty.")?;
            return Ok(());
        }

        writeln!(self.output, "\nWhich format to export:")?;
        for (n, format) in Format::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", n + 1, format)?;
        }
        writeln!(self.output, "e. Exit")?;

        let Some(choice) = self.prompt("Choose extension: ")? else {
            return Ok(());
        };
        let format = match choice.to_lowercase().as_str() {
            "1" => Format::Txt,
            "2" => Format::Csv,
            "3" => Format::Db,
            "e" => {
                writeln!(self.output, "Exiting...")?;
                return Ok(());
            }
            _ => {
                writeln!(self.output, "{}", WRONG_INPUT)?;
                return Ok(());
            }
        };

        let path = format.file_name(&stem);
        let input = &mut self.input;
        let output = &mut self.output;
        let ask = |duplicates: &[Car]| -> Result<bool> {
            writeln!(output, "The following cars already exist in the file:")?;
            for car in duplicates {
                writeln!(output, "{}", car)?;
            }
            write!(output, "Leave them out of the export? (y/n): ")?;
            output.flush()?;

            let mut answer = String::new();
            input.read_line(&mut answer)?;
            Ok(answer.trim().eq_ignore_ascii_case("y"))
        };
        let result = self
            .persistence
            .export_with_policy(self.inventory.cars(), &path, format, self.policy, ask)
            .await;

        match result {
            Ok(report) => {
                if !report.skipped.is_empty() {
                    writeln!(
                        self.output,
                        "Skipped {} cars already in {}",
                        report.skipped.len(),
                        report.path
                    )?;
                }
                writeln!(self.output, "Cars exported to {}", report.path)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    async fn import(&mut self) -> Result<()> {
        let files = match self.persistence.list_files(None).await {
            Ok(files) => files,
            Err(e) => return self.report(&e),
        };

        if files.is_empty() {
            writeln!(self.output, "No files to import.")?;
            return Ok(());
        }

        writeln!(self.output, "Choose a file to import:")?;
        for (idx, file) in files.iter().enumerate() {
            writeln!(self.output, "{}. {}", idx + 1, file)?;
        }

        let Some(choice) = self.prompt("Number of the file: ")? else {
            return Ok(());
        };
        let Some(chosen) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|idx| files.get(idx))
        else {
            writeln!(self.output, "{}", WRONG_INPUT)?;
            return Ok(());
        };

        match self.persistence.import(chosen).await {
            Ok(cars) => {
                writeln!(self.output, "Imported objects: ")?;
                for car in &cars {
                    writeln!(self.output, "{}", car)?;
                }
                self.inventory.extend(cars);
            }
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn add_car(&mut self) -> Result<()> {
        let Some(brand) = self.prompt("Enter car brand: ")? else {
            return Ok(());
        };
        let Some(car_type) = self.prompt("Enter car type (diesel, gas, electric): ")? else {
            return Ok(());
        };

        let year = loop {
            let Some(raw) = self.prompt("Enter car year: ")? else {
                return Ok(());
            };
            match parse_year(&raw) {
                Ok(year) => break year,
                Err(_) => writeln!(self.output, "Year must be a whole number.")?,
            }
        };

        let car = Car::new(brand, car_type, year);
        tracing::debug!("Adding {:?}", car);
        self.inventory.add(car);
        Ok(())
    }

    fn show_cars(&mut self) -> Result<()> {
        if self.inventory.is_empty() {
            writeln!(self.output, "No objects in the list. First populate the list.")?;
            return Ok(());
        }
        for (n, car) in self.inventory.cars().iter().enumerate() {
            writeln!(self.output, "{}. {}", n + 1, car)?;
        }
        Ok(())
    }

    fn delete_car(&mut self) -> Result<()> {
        writeln!(self.output, "List of cars:")?;
        self.show_cars()?;
        if self.inventory.is_empty() {
            return Ok(());
        }

        let Some(choice) = self.prompt("Enter the number of the car to delete: ")? else {
            return Ok(());
        };
        let Ok(number) = choice.parse::<usize>() else {
            writeln!(self.output, "{}", WRONG_INPUT)?;
            return Ok(());
        };

        let removed = match number.checked_sub(1) {
            Some(index) => self.inventory.remove(index),
            None => Err(InventoryError::IndexOutOfRange {
                index: number,
                len: self.inventory.len(),
            }),
        };
        match removed {
            Ok(_) => writeln!(self.output, "Car deleted.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }
}
