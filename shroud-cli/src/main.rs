// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pool_input::{load_pool_bytes, parse_rename_map};
use shroud_api::{copy_pool, list_pool_strings, rewrite_table_name_pool, Result, ShroudError};
use std::{env, fs};

pub mod pool_input;

/// Inspect or rewrite the string pool of a compiled resource table.
///
/// ```
/// $ shroud-cli list ./resources.arsc
/// $ shroud-cli list ./app.apk resources.arsc
/// $ shroud-cli copy ./resources.arsc ./pool-copy.bin
/// $ shroud-cli rename ./resources.arsc ./renamed.bin ./plan.txt
/// ```
///
/// Where `plan.txt` holds one `index=new_name` line per entry to rename;
/// every other entry is copied byte-for-byte, style runs included.
///
/// Inputs may be a raw string pool chunk or a whole `resources.arsc` (the
/// reader skips the table header to land on the value pool). For `list`,
/// a second path selects a file inside a zip archive.
fn main() -> Result<()> {
    let command = env::args()
        .nth(1)
        .ok_or(ShroudError::Cli("No command provided, expected list, copy or rename".into()))?;

    match &command[..] {
        "list" => {
            let input = required_arg(2, "Input path")?;
            let zip_inner = env::args().nth(3);
            let bytes = load_pool_bytes(&input, zip_inner.as_deref())?;
            for (index, name) in list_pool_strings(&bytes)?.iter().enumerate() {
                println!("{index}\t{name}");
            }
            Ok(())
        }
        "copy" => {
            let input = required_arg(2, "Input path")?;
            let output = required_arg(3, "Output path")?;
            let bytes = load_pool_bytes(&input, None)?;
            fs::write(&output, copy_pool(&bytes)?)?;
            println!("Wrote {output} to disk");
            Ok(())
        }
        "rename" => {
            let input = required_arg(2, "Input path")?;
            let output = required_arg(3, "Output path")?;
            let plan_path = required_arg(4, "Rename plan path")?;
            let plan = fs::read_to_string(&plan_path)?;
            let renames = parse_rename_map(&plan)?;
            let bytes = load_pool_bytes(&input, None)?;
            fs::write(&output, rewrite_table_name_pool(&bytes, &renames)?)?;
            println!("Renamed {} entries, wrote {output} to disk", renames.len());
            Ok(())
        }
        other => Err(ShroudError::Cli(format!("Unknown command {other:?}")))
    }
}

fn required_arg(position: usize, what: &str) -> Result<String> {
    env::args()
        .nth(position)
        .ok_or(ShroudError::Cli(format!("{what} not provided")))
}
