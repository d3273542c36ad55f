use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Result, DroneError};
use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A fully connected layer: weights, biases and an activation function,
/// plus the values cached by the last forward pass for backpropagation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Layer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation_output: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl Layer {
    /// Create a new layer with weights drawn uniformly from [-0.1, 0.1] and
    /// zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Self {
        let weights = Array2::random_using((input_size, output_size), Uniform::new(-0.1, 0.1), rng);
        let biases = Array1::zeros(output_size);
        Layer {
            weights,
            biases,
            activation,
            pre_activation_output: None,
            inputs: None,
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.shape()[0]
    }

    pub fn output_size(&self) -> usize {
        self.weights.shape()[1]
    }

    fn forward_minibatch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.pre_activation_output = Some(outputs.clone());
        self.activation.apply_minibatch(&mut outputs);
        outputs
    }

    /// Gradients for a batch of output errors. Returns the error adjusted by
    /// the activation derivative alongside the weight and bias gradients.
    fn backward_minibatch(
        &self,
        output_errors: ArrayView2<f32>,
    ) -> Result<(Array2<f32>, Array2<f32>, Array1<f32>)> {
        let (pre_activation_output, inputs) = match (&self.pre_activation_output, &self.inputs) {
            (Some(pre), Some(inputs)) => (pre, inputs),
            _ => {
                return Err(DroneError::Numerical(
                    "backward pass requested before a forward pass".to_string(),
                ))
            }
        };
        let activation_deriv = self.activation.derivative_minibatch(pre_activation_output.view());
        let adjusted_error = &output_errors * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        Ok((adjusted_error, weight_gradients, bias_gradients))
    }
}

/// Activation functions available to a layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply_minibatch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    fn derivative_minibatch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(inputs.dim()),
        }
    }
}

/// A feed-forward network of dense layers trained with mean squared error.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NeuralNetwork {
    pub layers: Vec<Layer>,
    pub optimizer: OptimizerWrapper,
}

impl NeuralNetwork {
    /// Build a network from layer sizes, one activation per weight layer.
    pub fn new<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        activations: &[Activation],
        optimizer: OptimizerWrapper,
        rng: &mut R,
    ) -> Result<Self> {
        if layer_sizes.len() < 2 {
            return Err(DroneError::invalid_parameter(
                "layer_sizes",
                "need at least input and output sizes",
            ));
        }
        if layer_sizes.len() - 1 != activations.len() {
            return Err(DroneError::dimension_mismatch(
                format!("{} activations", layer_sizes.len() - 1),
                format!("{} activations", activations.len()),
            ));
        }

        let layers = layer_sizes
            .windows(2)
            .zip(activations.iter())
            .map(|(window, &activation)| Layer::new(window[0], window[1], activation, rng))
            .collect();

        Ok(NeuralNetwork { layers, optimizer })
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(Layer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::output_size).unwrap_or(0)
    }

    /// Forward pass for a single input vector.
    pub fn forward(&mut self, input: ArrayView1<f32>) -> Result<Array1<f32>> {
        let output = self.forward_batch(input.insert_axis(Axis(0)))?;
        Ok(output.index_axis_move(Axis(0), 0))
    }

    /// Forward pass for a batch of input rows.
    pub fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Result<Array2<f32>> {
        if inputs.ncols() != self.input_size() {
            return Err(DroneError::dimension_mismatch(
                format!("{} input features", self.input_size()),
                format!("{} input features", inputs.ncols()),
            ));
        }
        let mut current_output = inputs.to_owned();
        for layer in &mut self.layers {
            current_output = layer.forward_minibatch(current_output.view());
        }
        Ok(current_output)
    }

    fn backward_minibatch(
        &self,
        output_errors: ArrayView2<f32>,
    ) -> Result<Vec<(Array2<f32>, Array1<f32>)>> {
        let mut gradients = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors.to_owned();

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_minibatch(current_error.view())?;
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }

        gradients.reverse();
        Ok(gradients)
    }

    /// One gradient step toward `targets` under mean squared error. Returns
    /// the loss measured before the update.
    pub fn train_minibatch(
        &mut self,
        inputs: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> Result<f32> {
        let outputs = self.forward_batch(inputs)?;
        if outputs.dim() != targets.dim() {
            return Err(DroneError::dimension_mismatch(
                format!("{:?}", outputs.dim()),
                format!("{:?}", targets.dim()),
            ));
        }

        let diff = &outputs - &targets;
        let n = diff.len().max(1) as f32;
        let loss = diff.mapv(|x| x * x).sum() / n;
        let output_errors = diff.mapv(|x| 2.0 * x / n);
        let gradients = self.backward_minibatch(output_errors.view())?;

        self.optimizer.begin_step();
        for (idx, (layer, (weight_gradients, bias_gradients))) in
            self.layers.iter_mut().zip(gradients).enumerate()
        {
            let optimizer = &mut self.optimizer;
            optimizer.update_weights(idx, &mut layer.weights, &weight_gradients, learning_rate);
            optimizer.update_biases(idx, &mut layer.biases, &bias_gradients, learning_rate);
        }
        Ok(loss)
    }
}
