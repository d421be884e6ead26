// Copyright 2026 BadCompany
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

//! Capability discovery.
//!
//! Describes what a concrete session type satisfies and resolves that
//! description into a flat, cached [`CapabilitySet`].

pub mod descriptor;
pub mod resolver;
pub mod set;

pub use descriptor::{Capability, CapabilityDescriptor, SessionType};
pub use resolver::{discover, global, resolve_capabilities, CapabilityResolver, ExclusionRule};
pub use set::CapabilitySet;
